use std::collections::VecDeque;
use tracing::trace;

/// 固定容量的先进先出缓冲区，容量满后新元素会挤出最早的元素。
#[derive(Debug)]
pub(crate) struct BoundedWindow<T> {
    buf: VecDeque<T>,
    cap: usize,
}

impl<T> BoundedWindow<T> {
    pub(crate) fn new(cap: usize) -> BoundedWindow<T> {
        // 容量可能来自很大的参数，只按需扩容
        BoundedWindow { buf: VecDeque::with_capacity(cap.min(1024)), cap }
    }

    /// 压入新元素，返回被挤出的元素。容量为0时新元素直接被挤出。
    pub(crate) fn push(&mut self, item: T) -> Option<T> {
        if self.cap == 0 {
            return Some(item);
        }
        let evicted = if self.buf.len() >= self.cap { self.buf.pop_front() } else { None };
        self.buf.push_back(item);
        evicted
    }

    pub(crate) fn pop_front(&mut self) -> Option<T> {
        self.buf.pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }
}

/// 仅保留最后N个元素。首次拉取时耗尽上游，之后按原顺序输出缓冲区内容。
pub(crate) struct TakeLast<I: Iterator> {
    source: Option<I>,
    window: BoundedWindow<I::Item>,
}

impl<I: Iterator> TakeLast<I> {
    pub(crate) fn new(source: I, count: usize) -> TakeLast<I> {
        TakeLast { source: Some(source), window: BoundedWindow::new(count) }
    }
}

impl<I: Iterator> Iterator for TakeLast<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(source) = self.source.take() {
            let mut total = 0usize;
            for item in source {
                total += 1;
                self.window.push(item);
            }
            trace!(total, kept = self.window.len(), "take_last drained source");
        }
        self.window.pop_front()
    }
}

/// 丢弃最后N个元素。缓冲区满后，每个新元素挤出的最早元素被输出。
pub(crate) struct DropLast<I: Iterator> {
    source: I,
    window: BoundedWindow<I::Item>,
}

impl<I: Iterator> DropLast<I> {
    pub(crate) fn new(source: I, count: usize) -> DropLast<I> {
        DropLast { source, window: BoundedWindow::new(count) }
    }
}

impl<I: Iterator> Iterator for DropLast<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let item = self.source.next()?;
            if let Some(evicted) = self.window.push(item) {
                return Some(evicted);
            }
        }
    }
}
