use crate::config::Order;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, trace};

/// 堆中的元素，仅按照`key`比较。
///
/// [`BinaryHeap`]是最大堆，这里把比较方向反转：`Order::Asc`时键最小的元素位于堆顶，`Order::Desc`时键最大的元素位于堆顶。
/// 键相同的元素出堆顺序不确定。
#[derive(Debug)]
pub(crate) struct HeapEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    order: Order,
}

impl<K, V> HeapEntry<K, V> {
    pub(crate) fn new(key: K, value: V, order: Order) -> HeapEntry<K, V> {
        HeapEntry { key, value, order }
    }
}

impl<K: Ord, V> PartialEq for HeapEntry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Ord, V> Eq for HeapEntry<K, V> {}

impl<K: Ord, V> PartialOrd for HeapEntry<K, V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord, V> Ord for HeapEntry<K, V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order.apply(other.key.cmp(&self.key))
    }
}

/// 近似排序：堆容量为`qlen`，堆满后每来一个新元素，先弹出并输出堆顶，再压入新元素；上游耗尽后按顺序输出堆中剩余元素。
pub(crate) struct QuasiSort<I, K, V>
where
    I: Iterator<Item = HeapEntry<K, V>>,
    K: Ord,
{
    source: I,
    heap: BinaryHeap<HeapEntry<K, V>>,
    qlen: usize,
    exhausted: bool,
}

impl<I, K, V> QuasiSort<I, K, V>
where
    I: Iterator<Item = HeapEntry<K, V>>,
    K: Ord,
{
    /// `qlen`必须为正数，由调用方校验。
    pub(crate) fn new(source: I, qlen: usize) -> QuasiSort<I, K, V> {
        QuasiSort { source, heap: BinaryHeap::with_capacity(qlen.min(1024)), qlen, exhausted: false }
    }
}

impl<I, K, V> Iterator for QuasiSort<I, K, V>
where
    I: Iterator<Item = HeapEntry<K, V>>,
    K: Ord,
{
    type Item = HeapEntry<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.exhausted {
            match self.source.next() {
                Some(entry) => {
                    if self.heap.len() >= self.qlen {
                        if let Some(mut top) = self.heap.peek_mut() {
                            return Some(std::mem::replace(&mut *top, entry));
                        }
                    }
                    self.heap.push(entry);
                }
                None => {
                    self.exhausted = true;
                    trace!(remaining = self.heap.len(), "quasi_sort source exhausted, draining heap");
                }
            }
        }
        self.heap.pop()
    }
}

/// 使用大小不超过`k`的堆选出最优的`k`个元素：元素为`Order::Asc`时选最大的，为`Order::Desc`时选最小的。
///
/// 结果顺序为堆内部顺序，不保证有序。
pub(crate) fn select_top_k<K: Ord, V>(
    source: impl Iterator<Item = HeapEntry<K, V>>, k: usize,
) -> Vec<HeapEntry<K, V>> {
    if k == 0 {
        return Vec::new();
    }
    // 堆顶始终是当前保留元素中最差的一个
    let mut heap = BinaryHeap::with_capacity(k.min(1024) + 1);
    let mut total = 0usize;
    for entry in source {
        total += 1;
        heap.push(entry);
        if heap.len() > k {
            heap.pop();
        }
    }
    debug!(total, k, kept = heap.len(), "top_k selected");
    heap.into_vec()
}
