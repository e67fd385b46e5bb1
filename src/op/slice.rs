use crate::config::SliceArg;

/// 按照`start`/`stop`/`step`选取元素，到达`stop`后不再拉取上游。
pub(crate) struct SliceIter<I> {
    source: I,
    /// 下一个从上游拉取的元素的索引
    pulled: usize,
    /// 下一个需要输出的元素的索引
    target: usize,
    stop: Option<usize>,
    step: usize,
    done: bool,
}

impl<I: Iterator> SliceIter<I> {
    pub(crate) fn new(source: I, arg: SliceArg) -> SliceIter<I> {
        SliceIter { source, pulled: 0, target: arg.start, stop: arg.stop, step: arg.step, done: false }
    }

    fn finish(&mut self) -> Option<I::Item> {
        self.done = true;
        None
    }
}

impl<I: Iterator> Iterator for SliceIter<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.stop.is_some_and(|stop| self.target >= stop) {
            return self.finish();
        }
        while self.pulled < self.target {
            if self.source.next().is_none() {
                return self.finish();
            }
            self.pulled += 1;
        }
        match self.source.next() {
            Some(item) => {
                self.pulled += 1;
                self.target = self.target.saturating_add(self.step);
                Some(item)
            }
            None => self.finish(),
        }
    }
}
