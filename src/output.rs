use crate::StreamRes;
use crate::config::Order;
use crate::err::StreamErr;
use crate::op::heap::{HeapEntry, select_top_k};
use crate::pipe::Stream;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::borrow::Borrow;
use std::cmp::{Ordering, Reverse};
use std::hash::Hash;
use tracing::debug;

/// 分组结果，键按照首次出现的顺序排列，组内元素保持源顺序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groups<K: Hash + Eq, V> {
    index: FxHashMap<K, usize>,
    groups: Vec<(K, Vec<V>)>,
}

impl<K: Hash + Eq + Clone, V> Groups<K, V> {
    fn new() -> Groups<K, V> {
        Groups { index: FxHashMap::default(), groups: Vec::new() }
    }

    fn push(&mut self, key: K, value: V) {
        match self.index.get(&key) {
            Some(&idx) => self.groups[idx].1.push(value),
            None => {
                self.index.insert(key.clone(), self.groups.len());
                self.groups.push((key, vec![value]));
            }
        }
    }
}

impl<K: Hash + Eq, V> Groups<K, V> {
    pub fn get<Q>(&self, key: &Q) -> Option<&[V]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).map(|&idx| self.groups[idx].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[V])> {
        self.groups.iter().map(|(key, values)| (key, values.as_slice()))
    }
}

impl<K: Hash + Eq, V> IntoIterator for Groups<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = std::vec::IntoIter<(K, Vec<V>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// 终结操作：消费整个流（或直到满足条件）并返回结果。
impl<'a, T: 'a> Stream<'a, T> {
    /// 统计元素数量。
    pub fn count(self) -> usize {
        self.iter.count()
    }

    pub fn foreach(self, action: impl FnMut(T)) {
        self.iter.for_each(action)
    }

    /// 按照`keyer`提取的键分组。
    pub fn groupby<K>(self, mut keyer: impl FnMut(&T) -> K) -> Groups<K, T>
    where
        K: Hash + Eq + Clone,
    {
        let mut groups = Groups::new();
        for item in self.iter {
            groups.push(keyer(&item), item);
        }
        debug!(groups = groups.len(), "groupby finished");
        groups
    }

    /* **************************************** 极值 **************************************** */

    /// 最大值，多个最大值时返回第一个；流为空时返回错误。
    pub fn max(self) -> StreamRes<T>
    where
        T: Ord,
    {
        pick(self.iter, |l, r| l.cmp(r), Ordering::Greater).ok_or(StreamErr::EmptyInput { op: "max" })
    }

    /// 最小值，多个最小值时返回第一个；流为空时返回错误。
    pub fn min(self) -> StreamRes<T>
    where
        T: Ord,
    {
        pick(self.iter, |l, r| l.cmp(r), Ordering::Less).ok_or(StreamErr::EmptyInput { op: "min" })
    }

    pub fn max_or(self, default: T) -> T
    where
        T: Ord,
    {
        self.max().unwrap_or(default)
    }

    pub fn min_or(self, default: T) -> T
    where
        T: Ord,
    {
        self.min().unwrap_or(default)
    }

    pub fn max_by_key<K: Ord>(self, mut key: impl FnMut(&T) -> K) -> StreamRes<T> {
        let keyed = self.iter.map(|item| (key(&item), item));
        pick(keyed, |l, r| l.0.cmp(&r.0), Ordering::Greater)
            .map(|(_, item)| item)
            .ok_or(StreamErr::EmptyInput { op: "max" })
    }

    pub fn min_by_key<K: Ord>(self, mut key: impl FnMut(&T) -> K) -> StreamRes<T> {
        let keyed = self.iter.map(|item| (key(&item), item));
        pick(keyed, |l, r| l.0.cmp(&r.0), Ordering::Less)
            .map(|(_, item)| item)
            .ok_or(StreamErr::EmptyInput { op: "min" })
    }

    /// 按照只有偏序的键（例如浮点数）求最大值，遇到无法比较的键时返回错误。
    pub fn max_by_partial_key<K: PartialOrd>(self, key: impl FnMut(&T) -> K) -> StreamRes<T> {
        pick_partial(self.iter, key, Ordering::Greater, "max")
    }

    /// 按照只有偏序的键（例如浮点数）求最小值，遇到无法比较的键时返回错误。
    pub fn min_by_partial_key<K: PartialOrd>(self, key: impl FnMut(&T) -> K) -> StreamRes<T> {
        pick_partial(self.iter, key, Ordering::Less, "min")
    }

    /* **************************************** 排序 **************************************** */

    /// 选出最大的`k`个元素（`Order::Desc`时选最小的），时间复杂度`O(N log k)`。
    ///
    /// 结果不保证有序，需要有序结果时再调用[`Stream::sorted`]。
    pub fn top_k(self, k: usize, order: impl Into<Order>) -> Stream<'a, T>
    where
        T: Ord,
    {
        let order = order.into();
        let entries = self.iter.map(move |item| HeapEntry::new(item, (), order));
        Stream::new(select_top_k(entries, k).into_iter().map(|entry| entry.key))
    }

    /// 按照`key`提取的键选出最大的`k`个元素，见[`Stream::top_k`]。
    pub fn top_k_by_key<K: Ord + 'a>(
        self, k: usize, mut key: impl FnMut(&T) -> K, order: impl Into<Order>,
    ) -> Stream<'a, T> {
        let order = order.into();
        let entries = self.iter.map(move |item| HeapEntry::new(key(&item), item, order));
        Stream::new(select_top_k(entries, k).into_iter().map(|entry| entry.value))
    }

    /// 完整排序，排序稳定。
    pub fn sorted(self, order: impl Into<Order>) -> Stream<'a, T>
    where
        T: Ord,
    {
        let sorted = match order.into() {
            Order::Asc => self.iter.sorted(),
            Order::Desc => self.iter.sorted_by(|l, r| r.cmp(l)),
        };
        debug!(len = sorted.len(), "sorted materialized");
        Stream::new(sorted)
    }

    /// 按照`key`提取的键完整排序，排序稳定。
    pub fn sorted_by_key<K: Ord>(self, mut key: impl FnMut(&T) -> K, order: impl Into<Order>) -> Stream<'a, T> {
        let sorted = match order.into() {
            Order::Asc => self.iter.sorted_by_key(key),
            Order::Desc => self.iter.sorted_by_key(|item| Reverse(key(item))),
        };
        debug!(len = sorted.len(), "sorted materialized");
        Stream::new(sorted)
    }

    /// 按照只有偏序的键排序，存在无法比较的键时返回错误。
    pub fn sorted_by_partial_key<K: PartialOrd + 'a>(
        self, mut key: impl FnMut(&T) -> K, order: impl Into<Order>,
    ) -> StreamRes<Stream<'a, T>> {
        let order = order.into();
        let mut keyed: Vec<(K, T)> = self.iter.map(|item| (key(&item), item)).collect();
        if let Some((first, _)) = keyed.first() {
            let comparable = keyed.iter().all(|(k, _)| k.partial_cmp(k).is_some() && first.partial_cmp(k).is_some());
            if !comparable {
                Err(StreamErr::Incomparable { op: "sorted" })?
            }
        }
        keyed.sort_by(|(l, _), (r, _)| order.apply(l.partial_cmp(r).unwrap_or(Ordering::Equal)));
        debug!(len = keyed.len(), "sorted materialized");
        Ok(Stream::new(keyed.into_iter().map(|(_, item)| item)))
    }

    /* **************************************** 查找 **************************************** */

    /// 第一个满足条件的元素，找到后立即停止拉取。
    pub fn find_first(mut self, pred: impl FnMut(&T) -> bool) -> Option<T> {
        self.iter.find(pred)
    }

    pub fn find_first_or(self, pred: impl FnMut(&T) -> bool, default: T) -> T {
        self.find_first(pred).unwrap_or(default)
    }

    /// 第一个满足条件的元素及其在流中的位置。
    pub fn find_first_indexed(self, mut pred: impl FnMut(&T) -> bool) -> Option<(usize, T)> {
        self.iter.enumerate().find(|(_, item)| pred(item))
    }

    pub fn first(mut self) -> Option<T> {
        self.iter.next()
    }

    /// 最后一个满足条件的元素，需要消费整个流；没有满足条件的元素时返回错误。
    pub fn find_last(self, pred: impl FnMut(&T) -> bool) -> StreamRes<T> {
        self.iter.filter(pred).last().ok_or(StreamErr::EmptyInput { op: "find_last" })
    }

    pub fn find_last_or(self, pred: impl FnMut(&T) -> bool, default: T) -> T {
        self.find_last(pred).unwrap_or(default)
    }

    /// 最后一个元素；流为空时返回错误。
    pub fn last(self) -> StreamRes<T> {
        self.iter.last().ok_or(StreamErr::EmptyInput { op: "last" })
    }
}

/// 最大值的索引，多个最大值时返回第一个的索引；序列为空时返回错误。
pub fn argmax<T: Ord>(values: &[T]) -> StreamRes<usize> {
    argmax_by_key(values, |v| v)
}

/// 最小值的索引，多个最小值时返回第一个的索引；序列为空时返回错误。
pub fn argmin<T: Ord>(values: &[T]) -> StreamRes<usize> {
    argmin_by_key(values, |v| v)
}

pub fn argmax_by_key<'v, T, K: Ord>(values: &'v [T], mut key: impl FnMut(&'v T) -> K) -> StreamRes<usize> {
    let keyed = values.iter().enumerate().map(|(idx, v)| (idx, key(v)));
    pick(keyed, |l, r| l.1.cmp(&r.1), Ordering::Greater)
        .map(|(idx, _)| idx)
        .ok_or(StreamErr::EmptyInput { op: "argmax" })
}

pub fn argmin_by_key<'v, T, K: Ord>(values: &'v [T], mut key: impl FnMut(&'v T) -> K) -> StreamRes<usize> {
    let keyed = values.iter().enumerate().map(|(idx, v)| (idx, key(v)));
    pick(keyed, |l, r| l.1.cmp(&r.1), Ordering::Less)
        .map(|(idx, _)| idx)
        .ok_or(StreamErr::EmptyInput { op: "argmin" })
}

/// 线性扫描，仅当新元素严格优于当前结果（比较结果为`target`）时替换，因此相等时保留第一个。
fn pick<T>(
    mut iter: impl Iterator<Item = T>, mut cmp: impl FnMut(&T, &T) -> Ordering, target: Ordering,
) -> Option<T> {
    let mut best = iter.next()?;
    for item in iter {
        if cmp(&item, &best) == target {
            best = item;
        }
    }
    Some(best)
}

fn pick_partial<T, K: PartialOrd>(
    mut iter: impl Iterator<Item = T>, mut key: impl FnMut(&T) -> K, target: Ordering, op: &'static str,
) -> StreamRes<T> {
    let mut best = iter.next().ok_or(StreamErr::EmptyInput { op })?;
    let mut best_key = key(&best);
    if best_key.partial_cmp(&best_key).is_none() {
        Err(StreamErr::Incomparable { op })?
    }
    for item in iter {
        let item_key = key(&item);
        match item_key.partial_cmp(&best_key) {
            Some(ordering) if ordering == target => {
                best = item;
                best_key = item_key;
            }
            Some(_) => {}
            None => Err(StreamErr::Incomparable { op })?,
        }
    }
    Ok(best)
}
