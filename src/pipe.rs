use crate::config::SliceArg;
use crate::err::StreamErr;
use crate::op::slice::SliceIter;
use crate::{Integer, StreamRes};
use itertools::{EitherOrBoth, Itertools};
use std::fmt;

/// 惰性、单次遍历的数据流。
///
/// 每个中间操作都会消费当前流并返回包裹它的新流，只有在终结操作拉取数据时才会逐个从上游获取元素。
/// 流不可重启：上游耗尽后继续拉取始终返回`None`。
pub struct Stream<'a, T> {
    pub(crate) iter: Box<dyn Iterator<Item = T> + 'a>,
}

impl<T> Iterator for Stream<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T> fmt::Debug for Stream<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream").field("size_hint", &self.iter.size_hint()).finish_non_exhaustive()
    }
}

impl<'a, T: 'a> Stream<'a, T> {
    /// 将任意可迭代对象适配为流，构造时不会拉取任何元素。
    pub fn new<I>(src: I) -> Stream<'a, T>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Stream { iter: Box::new(src.into_iter()) }
    }

    pub(crate) fn wrap(iter: impl Iterator<Item = T> + 'a) -> Stream<'a, T> {
        Stream { iter: Box::new(iter) }
    }

    pub fn empty() -> Stream<'a, T> {
        Stream::wrap(std::iter::empty())
    }

    /* **************************************** 访问 **************************************** */

    /// 在元素流经时执行`action`，不改变元素。
    pub fn peek(self, action: impl FnMut(&T) + 'a) -> Stream<'a, T> {
        Stream::wrap(self.iter.inspect(action))
    }

    /* **************************************** 转换 **************************************** */

    pub fn map<U: 'a>(self, mapper: impl FnMut(T) -> U + 'a) -> Stream<'a, U> {
        Stream::wrap(self.iter.map(mapper))
    }

    /// 每个元素映射为一个子序列或`None`，子序列按顺序拼接，`None`不产生任何元素。
    pub fn flatmap<U, I, F>(self, mapper: F) -> Stream<'a, U>
    where
        U: 'a,
        I: IntoIterator<Item = U> + 'a,
        I::IntoIter: 'a,
        F: FnMut(T) -> Option<I> + 'a,
    {
        Stream::wrap(self.iter.filter_map(mapper).flatten())
    }

    /// 为每个元素附加从`start`开始递增的序号。
    pub fn zip_index(self, start: Integer) -> Stream<'a, (Integer, T)> {
        Stream::wrap((start..).zip(self.iter))
    }

    /// 与另一个序列逐对组合，任一侧耗尽即结束。
    pub fn zip<U: 'a>(self, other: impl IntoIterator<Item = U, IntoIter: 'a>) -> Stream<'a, (T, U)> {
        Stream::wrap(self.iter.zip(other))
    }

    /// 与另一个序列逐对组合直到两侧都耗尽，已耗尽的一侧用填充值代替。
    pub fn zip_longest<U>(
        self, other: impl IntoIterator<Item = U, IntoIter: 'a>, fill_self: T, fill_other: U,
    ) -> Stream<'a, (T, U)>
    where
        T: Clone,
        U: Clone + 'a,
    {
        Stream::wrap(self.iter.zip_longest(other).map(move |pair| match pair {
            EitherOrBoth::Both(left, right) => (left, right),
            EitherOrBoth::Left(left) => (left, fill_other.clone()),
            EitherOrBoth::Right(right) => (fill_self.clone(), right),
        }))
    }

    /// 累积：首个元素原样输出，之后每次输出`combine(上次输出, 下一个元素)`。
    pub fn accumulate(self, mut combine: impl FnMut(&T, T) -> T + 'a) -> Stream<'a, T>
    where
        T: Clone,
    {
        Stream::wrap(self.iter.scan(None, move |prev: &mut Option<T>, item| {
            let next = match prev.take() {
                Some(prev) => combine(&prev, item),
                None => item,
            };
            *prev = Some(next.clone());
            Some(next)
        }))
    }

    /// 带初始值的累积：先输出`initial`，之后每次输出`combine(上次输出, 下一个元素)`。
    pub fn accumulate_from<A>(self, initial: A, mut combine: impl FnMut(&A, T) -> A + 'a) -> Stream<'a, A>
    where
        A: Clone + 'a,
    {
        let head = std::iter::once(initial.clone());
        Stream::wrap(head.chain(self.iter.scan(initial, move |acc, item| {
            *acc = combine(acc, item);
            Some(acc.clone())
        })))
    }

    /* **************************************** 减少 **************************************** */

    /// 保留满足条件的元素，条件对每个被拉取的元素恰好调用一次。
    pub fn filter(self, pred: impl FnMut(&T) -> bool + 'a) -> Stream<'a, T> {
        Stream::wrap(self.iter.filter(pred))
    }

    /// 同[`Stream::filter`]。
    pub fn r#where(self, pred: impl FnMut(&T) -> bool + 'a) -> Stream<'a, T> {
        self.filter(pred)
    }

    /// 最多保留前`count`个元素，之后不再拉取上游。
    pub fn take(self, count: usize) -> Stream<'a, T> {
        Stream::wrap(self.iter.take(count))
    }

    /// 丢弃前`count`个元素。
    pub fn drop(self, count: usize) -> Stream<'a, T> {
        Stream::wrap(self.iter.skip(count))
    }

    /// 持续保留直到条件首次不满足，不满足的元素被消费但不输出。
    pub fn take_while(self, pred: impl FnMut(&T) -> bool + 'a) -> Stream<'a, T> {
        Stream::wrap(self.iter.take_while(pred))
    }

    /// 持续丢弃直到条件首次不满足，之后全部输出。
    pub fn drop_while(self, pred: impl FnMut(&T) -> bool + 'a) -> Stream<'a, T> {
        Stream::wrap(self.iter.skip_while(pred))
    }

    /// 切片，语义同`start..stop`按`step`间隔选取，`step`必须为正数。
    pub fn islice(self, arg: impl Into<SliceArg>) -> StreamRes<Stream<'a, T>> {
        let arg = arg.into();
        if arg.step == 0 {
            Err(StreamErr::invalid_arg("islice", "step", "must be positive"))?
        }
        Ok(Stream::wrap(SliceIter::new(self.iter, arg)))
    }

    /* **************************************** 收集 **************************************** */

    pub fn to_vec(self) -> Vec<T> {
        self.iter.collect()
    }
}

impl<'a, T: 'a, E: 'a> Stream<'a, Result<T, E>> {
    /// 收集所有成功值，遇到第一个错误立即停止拉取并返回该错误。
    pub fn try_to_vec(self) -> Result<Vec<T>, E> {
        Itertools::try_collect(self.iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::err::ErrKind;
    use std::cell::Cell;

    #[test]
    fn test_new_does_not_pull() {
        let pulled = Cell::new(0);
        let stream = Stream::new((0..10).inspect(|_| pulled.set(pulled.get() + 1)));
        assert_eq!(0, pulled.get());
        assert_eq!(vec![0, 1], stream.take(2).to_vec());
        assert_eq!(2, pulled.get());
    }

    #[test]
    fn test_empty() {
        let mut stream = Stream::<i32>::empty();
        assert_eq!(None, stream.next());
        assert_eq!(0, Stream::<i32>::empty().count());
        assert_eq!(vec![(1, 0)], Stream::new([1]).zip_longest(Stream::empty(), 9, 0).to_vec());
    }

    #[test]
    fn test_single_use() {
        let mut stream = Stream::new(vec![1, 2]);
        assert_eq!(Some(1), stream.next());
        assert_eq!(Some(2), stream.next());
        assert_eq!(None, stream.next());
        assert_eq!(None, stream.next());
    }

    #[test]
    fn test_filter_calls_pred_once_per_pulled_element() {
        let calls = Cell::new(0);
        let mut stream = Stream::new(1..=10).filter(|v| {
            calls.set(calls.get() + 1);
            v % 2 == 0
        });
        assert_eq!(Some(2), stream.next());
        assert_eq!(2, calls.get());
        assert_eq!(vec![4, 6, 8, 10], stream.to_vec());
        assert_eq!(10, calls.get());
    }

    #[test]
    fn test_where() {
        assert_eq!(vec!["b", "bb"], Stream::new(["a", "b", "bb"]).r#where(|s| s.starts_with('b')).to_vec());
    }

    #[test]
    fn test_map_and_peek() {
        let mut seen = Vec::new();
        let res = Stream::new(vec![1, 2, 3]).peek(|v| seen.push(*v)).map(|v| v.to_string()).to_vec();
        assert_eq!(vec!["1", "2", "3"], res);
        assert_eq!(vec![1, 2, 3], seen);
    }

    #[test]
    fn test_flatmap() {
        let res = Stream::new(0usize..5).flatmap(|v| if v % 2 == 0 { Some(vec![v; v]) } else { None }).to_vec();
        assert_eq!(vec![2, 2, 4, 4, 4, 4], res);
        let res = Stream::new(["a b", "", "c"]).flatmap(|s| Some(s.split_whitespace())).to_vec();
        assert_eq!(vec!["a", "b", "c"], res);
    }

    #[test]
    fn test_take_on_infinite() {
        let pulled = Cell::new(0);
        let res = Stream::new(0..).peek(|_| pulled.set(pulled.get() + 1)).take(5).to_vec();
        assert_eq!(vec![0, 1, 2, 3, 4], res);
        assert_eq!(5, pulled.get());
        assert!(Stream::new(0..).take(0).to_vec().is_empty());
    }

    #[test]
    fn test_drop() {
        assert_eq!(vec![3, 4], Stream::new(1..=4).drop(2).to_vec());
        assert!(Stream::new(1..=4).drop(10).to_vec().is_empty());
        assert_eq!(vec![1, 2], Stream::new(1..=2).drop(0).to_vec());
    }

    #[test]
    fn test_take_while() {
        let mut stream = Stream::new(vec![1, 2, 5, 1, 2]).take_while(|v| *v < 3);
        assert_eq!(Some(1), stream.next());
        assert_eq!(Some(2), stream.next());
        assert_eq!(None, stream.next());
        // 终止后不再恢复
        assert_eq!(None, stream.next());
    }

    #[test]
    fn test_drop_while() {
        assert_eq!(vec![5, 1, 2], Stream::new(vec![1, 2, 5, 1, 2]).drop_while(|v| *v < 3).to_vec());
        assert!(Stream::new(vec![1, 2]).drop_while(|_| true).to_vec().is_empty());
    }

    #[test]
    fn test_islice() {
        assert_eq!(vec![0, 1, 2], Stream::new(0..10).islice(SliceArg::stop(3)).unwrap().to_vec());
        assert_eq!(vec![2, 3, 4], Stream::new(0..10).islice(2..5).unwrap().to_vec());
        assert_eq!(vec![7, 8, 9], Stream::new(0..10).islice(7..).unwrap().to_vec());
        assert_eq!(vec![1, 4, 7], Stream::new(0..10).islice(SliceArg::new(1, Some(9), 3)).unwrap().to_vec());
        assert_eq!(vec![10, 13], Stream::new(0..).islice(SliceArg::new(10, Some(15), 3)).unwrap().to_vec());
        assert!(Stream::new(0..10).islice(5..2).unwrap().to_vec().is_empty());
    }

    #[test]
    fn test_islice_zero_step() {
        let err = Stream::new(0..10).islice(SliceArg::new(0, None, 0)).unwrap_err();
        assert_eq!(ErrKind::InvalidArg, err.kind());
    }

    #[test]
    fn test_zip_index() {
        assert_eq!(vec![(0, 'a'), (1, 'b')], Stream::new(['a', 'b']).zip_index(0).to_vec());
        assert_eq!(vec![(5, 'a'), (6, 'b')], Stream::new(['a', 'b']).zip_index(5).to_vec());
    }

    #[test]
    fn test_zip() {
        assert_eq!(vec![(1, "a"), (2, "b")], Stream::new(1..=3).zip(["a", "b"]).to_vec());
        assert_eq!(vec![(1, 'x'), (2, 'y')], Stream::new(1..).zip(Stream::new(['x', 'y'])).to_vec());
    }

    #[test]
    fn test_zip_longest() {
        assert_eq!(vec![(1, "a"), (2, "b"), (3, "-")], Stream::new(1..=3).zip_longest(["a", "b"], 0, "-").to_vec());
        assert_eq!(vec![(1, "a"), (0, "b")], Stream::new(1..=1).zip_longest(["a", "b"], 0, "-").to_vec());
    }

    #[test]
    fn test_accumulate() {
        assert_eq!(vec![1, 3, 6, 10], Stream::new(1..=4).accumulate(|acc, v| acc + v).to_vec());
        assert!(Stream::new(Vec::<i32>::new()).accumulate(|acc, v| acc + v).to_vec().is_empty());
    }

    #[test]
    fn test_accumulate_from() {
        assert_eq!(vec![100, 101, 103, 106], Stream::new(1..=3).accumulate_from(100, |acc, v| acc + v).to_vec());
        let res = Stream::new(["a", "b"]).accumulate_from(String::new(), |acc, v| format!("{acc}{v}")).to_vec();
        assert_eq!(vec!["", "a", "ab"], res);
        assert_eq!(vec![0], Stream::new(Vec::<i32>::new()).accumulate_from(0, |acc, v| acc + v).to_vec());
    }

    #[test]
    fn test_try_to_vec_stops_at_first_err() {
        let pulled = Cell::new(0);
        let res = Stream::new(1..=5)
            .peek(|_| pulled.set(pulled.get() + 1))
            .map(|v| if v == 3 { Err(format!("bad {v}")) } else { Ok(v) })
            .try_to_vec();
        assert_eq!(Err("bad 3".to_string()), res);
        assert_eq!(3, pulled.get());
        assert_eq!(Ok(vec![1, 2]), Stream::new(1..=2).map(Ok::<_, String>).try_to_vec());
    }
}
