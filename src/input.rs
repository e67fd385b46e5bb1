use crate::err::StreamErr;
use crate::pipe::Stream;
use crate::StreamRes;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::ops::{Range, RangeFrom, RangeInclusive};
use tracing::debug;

/// 键值对，用于把映射适配为流。
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct KeyValue<K, V> {
    key: K,
    value: V,
}

impl<K, V> KeyValue<K, V> {
    pub fn new(key: K, value: V) -> KeyValue<K, V> {
        KeyValue { key, value }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}

impl<K, V> From<(K, V)> for KeyValue<K, V> {
    fn from((key, value): (K, V)) -> Self {
        KeyValue { key, value }
    }
}

impl<K, V> From<KeyValue<K, V>> for (K, V) {
    fn from(kv: KeyValue<K, V>) -> Self {
        kv.into_pair()
    }
}

/// 可以转为[`Stream`]的数据源。
///
/// 已经是流（或已装箱的迭代器）的数据源不会被再次包装。
pub trait IntoStream<'a> {
    type Item: 'a;

    fn into_stream(self) -> Stream<'a, Self::Item>;
}

impl<'a, T: 'a> IntoStream<'a> for Stream<'a, T> {
    type Item = T;

    fn into_stream(self) -> Stream<'a, T> {
        self
    }
}

impl<'a, T: 'a> IntoStream<'a> for Box<dyn Iterator<Item = T> + 'a> {
    type Item = T;

    fn into_stream(self) -> Stream<'a, T> {
        Stream { iter: self }
    }
}

impl<'a, T: 'a> IntoStream<'a> for &'a [T] {
    type Item = &'a T;

    fn into_stream(self) -> Stream<'a, &'a T> {
        Stream::new(self)
    }
}

impl<'a, T: 'a, const N: usize> IntoStream<'a> for [T; N] {
    type Item = T;

    fn into_stream(self) -> Stream<'a, T> {
        Stream::new(self)
    }
}

macro_rules! impl_into_stream {
    ($($src:ident<$($g:ident),+> => $item:ty),+ $(,)?) => {
        $(
            impl<'a, $($g: 'a),+> IntoStream<'a> for $src<$($g),+> {
                type Item = $item;

                fn into_stream(self) -> Stream<'a, $item> {
                    Stream::new(self)
                }
            }
        )+
    };
}

impl_into_stream! {
    Vec<T> => T,
    VecDeque<T> => T,
    Option<T> => T,
    BTreeSet<T> => T,
    HashSet<T, S> => T,
    BTreeMap<K, V> => (K, V),
    HashMap<K, V, S> => (K, V),
}

macro_rules! impl_range_into_stream {
    ($($range:ident),+) => {
        $(
            impl<'a, A: 'a> IntoStream<'a> for $range<A>
            where
                $range<A>: Iterator<Item = A>,
            {
                type Item = A;

                fn into_stream(self) -> Stream<'a, A> {
                    Stream::new(self)
                }
            }
        )+
    };
}

impl_range_into_stream!(Range, RangeFrom, RangeInclusive);

/// 数据源与生成器
impl<'a, T: 'a> Stream<'a, T> {
    /// 从任意[`IntoStream`]构造流，已是流的数据源原样返回。
    pub fn of(src: impl IntoStream<'a, Item = T>) -> Stream<'a, T> {
        src.into_stream()
    }

    /// 无限序列：`init, inc(init), inc(inc(init)), ...`，`inc`只在拉取下一个元素时调用。
    pub fn generate(init: T, inc: impl FnMut(&T) -> T + 'a) -> Stream<'a, T>
    where
        T: Clone,
    {
        Stream::wrap(Generate { init: Some(init), prev: None, inc })
    }

    /// 无限序列：每次调用`step`消费当前状态，返回新状态和需要输出的值。
    pub fn unfold<S: 'a>(init: S, step: impl FnMut(S) -> (S, T) + 'a) -> Stream<'a, T> {
        Stream::wrap(Unfold { state: Some(init), step })
    }

    /// 重复`value`共`times`次。
    pub fn repeat(value: T, times: usize) -> Stream<'a, T>
    where
        T: Clone,
    {
        Stream::wrap(std::iter::repeat_n(value, times))
    }

    /// 无限循环有限数据源：首轮边输出边缓存，之后循环输出缓存。数据源为空时结果为空流。
    pub fn cycle(src: impl IntoIterator<Item = T, IntoIter: 'a>) -> Stream<'a, T>
    where
        T: Clone,
    {
        Stream::wrap(Cycle { source: Some(src.into_iter()), saved: Vec::new(), pos: 0 })
    }

    /// 从`start`开始按`step`递增，直到值大于`stop`；`stop`为`None`时为无限序列。
    ///
    /// `step`必须大于`T::default()`（即为正数）。下一个值超出`T`的表示范围时流结束。
    pub fn range(start: T, stop: Option<T>, step: T) -> StreamRes<Stream<'a, T>>
    where
        T: RangeStep,
    {
        if step.partial_cmp(&T::default()) != Some(Ordering::Greater) {
            Err(StreamErr::invalid_arg("range", "step", "must be positive"))?
        }
        Ok(Stream::wrap(RangeIter { start: Some(start), prev: None, stop, step }))
    }
}

impl<'a, K: 'a, V: 'a> Stream<'a, KeyValue<K, V>> {
    /// 将映射（或任意键值对序列）按其迭代顺序适配为[`KeyValue`]流。
    pub fn from_map(values: impl IntoIterator<Item = (K, V), IntoIter: 'a>) -> Stream<'a, KeyValue<K, V>> {
        Stream::wrap(values.into_iter().map(KeyValue::from))
    }
}

struct Generate<T, F> {
    init: Option<T>,
    prev: Option<T>,
    inc: F,
}

impl<T, F> Iterator for Generate<T, F>
where
    T: Clone,
    F: FnMut(&T) -> T,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = match self.prev.take() {
            Some(prev) => (self.inc)(&prev),
            None => self.init.take()?,
        };
        self.prev = Some(value.clone());
        Some(value)
    }
}

struct Unfold<S, F> {
    state: Option<S>,
    step: F,
}

impl<S, T, F> Iterator for Unfold<S, F>
where
    F: FnMut(S) -> (S, T),
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let (state, value) = (self.step)(self.state.take()?);
        self.state = Some(state);
        Some(value)
    }
}

struct Cycle<I: Iterator> {
    source: Option<I>,
    saved: Vec<I::Item>,
    pos: usize,
}

impl<I> Iterator for Cycle<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = self.source.as_mut() {
            if let Some(item) = source.next() {
                self.saved.push(item.clone());
                return Some(item);
            }
            self.source = None;
            debug!(len = self.saved.len(), "cycle finished first pass");
        }
        if self.saved.is_empty() {
            return None;
        }
        if self.pos >= self.saved.len() {
            self.pos = 0;
        }
        let item = self.saved[self.pos].clone();
        self.pos += 1;
        Some(item)
    }
}

/// [`Stream::range`]的元素类型：可比较，`T::default()`为零值，并且可以按步长前进。
pub trait RangeStep: PartialOrd + Clone + Default {
    /// 返回`self + step`，超出表示范围时返回`None`。
    fn checked_step(&self, step: &Self) -> Option<Self>;
}

macro_rules! impl_range_step_int {
    ($($t:ty),+) => {
        $(
            impl RangeStep for $t {
                #[inline]
                fn checked_step(&self, step: &Self) -> Option<Self> {
                    self.checked_add(*step)
                }
            }
        )+
    };
}

impl_range_step_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_range_step_float {
    ($($t:ty),+) => {
        $(
            impl RangeStep for $t {
                #[inline]
                fn checked_step(&self, step: &Self) -> Option<Self> {
                    Some(self + step)
                }
            }
        )+
    };
}

impl_range_step_float!(f32, f64);

#[derive(Debug, Eq, PartialEq)]
struct RangeIter<T> {
    start: Option<T>,
    prev: Option<T>,
    stop: Option<T>,
    step: T,
}

impl<T: RangeStep> Iterator for RangeIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = match self.prev.take() {
            Some(prev) => prev.checked_step(&self.step)?,
            None => self.start.take()?,
        };
        if self.stop.as_ref().is_some_and(|stop| value > *stop) {
            return None;
        }
        self.prev = Some(value.clone());
        Some(value)
    }
}
