pub(crate) mod heap;
pub(crate) mod slice;
pub(crate) mod window;

use crate::config::Order;
use crate::err::StreamErr;
use crate::op::heap::{HeapEntry, QuasiSort};
use crate::op::window::{DropLast, TakeLast};
use crate::pipe::Stream;
use crate::StreamRes;
use rustc_hash::FxHashSet;
use std::hash::Hash;

/// 有状态的中间操作。所有操作在构造时都不拉取上游。
impl<'a, T: 'a> Stream<'a, T> {
    /// 仅保留最后`count`个元素。
    ///
    /// 首次拉取时会耗尽上游，因此不能用于无限流。
    pub fn take_last(self, count: usize) -> Stream<'a, T> {
        Stream::wrap(TakeLast::new(self.iter, count))
    }

    /// 丢弃最后`count`个元素，最多缓存`count`个元素。
    pub fn drop_last(self, count: usize) -> Stream<'a, T> {
        Stream::wrap(DropLast::new(self.iter, count))
    }

    /// 使用容量为`qlen`的堆进行近似排序。
    ///
    /// 每个输出的元素不大于（逆序时不小于）此后输出的、在源中位置距离它不足`qlen`的所有元素。
    /// `qlen`为1时输出与输入相同，`qlen`不小于元素数量时结果完全有序。相等元素的相对顺序不保证。
    pub fn quasi_sort(self, qlen: usize, order: impl Into<Order>) -> StreamRes<Stream<'a, T>>
    where
        T: Ord,
    {
        check_qlen(qlen)?;
        let order = order.into();
        let entries = self.iter.map(move |item| HeapEntry::new(item, (), order));
        Ok(Stream::wrap(QuasiSort::new(entries, qlen).map(|entry| entry.key)))
    }

    /// 按照`key`提取的键近似排序，见[`Stream::quasi_sort`]。
    pub fn quasi_sort_by_key<K>(
        self, qlen: usize, mut key: impl FnMut(&T) -> K + 'a, order: impl Into<Order>,
    ) -> StreamRes<Stream<'a, T>>
    where
        K: Ord + 'a,
    {
        check_qlen(qlen)?;
        let order = order.into();
        let entries = self.iter.map(move |item| HeapEntry::new(key(&item), item, order));
        Ok(Stream::wrap(QuasiSort::new(entries, qlen).map(|entry| entry.value)))
    }

    /// 去重，每个值只保留首次出现的元素。
    ///
    /// 已见过的值会一直保存到流结束。
    pub fn distinct(self) -> Stream<'a, T>
    where
        T: Hash + Eq + Clone,
    {
        let mut seen = FxHashSet::default();
        Stream::wrap(self.iter.filter(move |item| seen.insert(item.clone())))
    }

    /// 按照`key`提取的键去重，每个键只保留首次出现的元素。
    pub fn distinct_by_key<K>(self, mut key: impl FnMut(&T) -> K + 'a) -> Stream<'a, T>
    where
        K: Hash + Eq + 'a,
    {
        let mut seen = FxHashSet::default();
        Stream::wrap(self.iter.filter(move |item| seen.insert(key(item))))
    }
}

fn check_qlen(qlen: usize) -> StreamRes<()> {
    if qlen == 0 {
        Err(StreamErr::invalid_arg("quasi_sort", "qlen", "must be positive"))?
    }
    Ok(())
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_take_last_keeps_tail(values in prop::collection::vec(any::<i32>(), 0..100), n in 0usize..120) {
            let expected = values[values.len().saturating_sub(n)..].to_vec();
            prop_assert_eq!(expected, Stream::new(values).take_last(n).to_vec());
        }

        #[test]
        fn prop_drop_last_keeps_head(values in prop::collection::vec(any::<i32>(), 0..100), n in 0usize..120) {
            let expected = values[..values.len().saturating_sub(n)].to_vec();
            prop_assert_eq!(expected, Stream::new(values).drop_last(n).to_vec());
        }

        #[test]
        fn prop_quasi_sort_is_bounded_permutation(values in prop::collection::vec(-50i32..50, 0..100), qlen in 1usize..10) {
            // 携带源位置，以便检查窗口内的顺序保证
            let emitted = Stream::new(values.clone())
                .zip_index(0)
                .quasi_sort_by_key(qlen, |(_, v)| *v, Order::Asc)
                .unwrap()
                .to_vec();
            let mut sorted_in: Vec<i32> = values.clone();
            sorted_in.sort();
            let mut sorted_out: Vec<i32> = emitted.iter().map(|(_, v)| *v).collect();
            sorted_out.sort();
            prop_assert_eq!(sorted_in, sorted_out);
            for (i, (_, earlier)) in emitted.iter().enumerate() {
                for (src_idx, later) in &emitted[i + 1..] {
                    if (*src_idx as usize) < i + qlen {
                        prop_assert!(earlier <= later);
                    }
                }
            }
        }

        #[test]
        fn prop_distinct_keeps_first_occurrence(values in prop::collection::vec(0u8..20, 0..100)) {
            let mut expected = Vec::new();
            for v in &values {
                if !expected.contains(v) {
                    expected.push(*v);
                }
            }
            prop_assert_eq!(expected, Stream::new(values).distinct().to_vec());
        }
    }
}
