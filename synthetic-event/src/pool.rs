//! 按种类划分的有界对象池
//!
//! 每个种类在定义时创建自己的池，子种类不共享父种类的池。池只保存已拆卸
//! （字段清空、代次递增）的空闲槽位；超过容量的释放直接丢弃，仅影响分配开销。
//!
use crate::event::EventSlot;
use serde::Serialize;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

/// 池的累计统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// 新分配的实例数
    pub allocated: usize,
    /// 从池中复用的次数
    pub recycled: usize,
    /// 释放后放回池中的次数
    pub pooled: usize,
    /// 因池已满而丢弃的次数
    pub discarded: usize,
    /// 因已 persist 而未回收的释放次数
    pub persisted: usize,
}

pub(crate) struct EventPool {
    capacity: usize,
    free: RefCell<Vec<Rc<EventSlot>>>,
    stats: Cell<PoolStats>,
}

impl EventPool {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            free: RefCell::new(Vec::with_capacity(capacity)),
            stats: Cell::new(PoolStats::default()),
        }
    }

    /// 取出一个空闲槽位，池空时新分配
    pub(crate) fn take(&self) -> Rc<EventSlot> {
        let popped = self.free.borrow_mut().pop();
        match popped {
            Some(slot) => {
                self.update(|s| s.recycled += 1);
                slot
            }
            None => {
                self.update(|s| s.allocated += 1);
                Rc::new(EventSlot::new())
            }
        }
    }

    /// 归还已拆卸的槽位；返回是否真正入池
    pub(crate) fn put_back(&self, slot: Rc<EventSlot>) -> bool {
        let mut free = self.free.borrow_mut();
        if free.len() < self.capacity {
            free.push(slot);
            drop(free);
            self.update(|s| s.pooled += 1);
            true
        } else {
            drop(free);
            self.update(|s| s.discarded += 1);
            false
        }
    }

    pub(crate) fn note_persisted(&self) {
        self.update(|s| s.persisted += 1);
    }

    pub(crate) fn len(&self) -> usize {
        self.free.borrow().len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn stats(&self) -> PoolStats {
        self.stats.get()
    }

    fn update(&self, f: impl FnOnce(&mut PoolStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

#[cfg(test)]
mod tests {
    use super::EventPool;
    use std::rc::Rc;

    #[test]
    fn take_from_empty_pool_allocates_distinct_slots() {
        let pool = EventPool::new(2);
        let a = pool.take();
        let b = pool.take();
        assert!(!Rc::ptr_eq(&a, &b));
        assert_eq!(pool.stats().allocated, 2);
    }

    #[test]
    fn put_back_respects_capacity() {
        let pool = EventPool::new(2);
        let slots: Vec<_> = (0..3).map(|_| pool.take()).collect();
        let pooled: Vec<bool> = slots.into_iter().map(|s| pool.put_back(s)).collect();
        assert_eq!(pooled, vec![true, true, false]);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.stats().discarded, 1);

        let again = pool.take();
        drop(again);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.stats().recycled, 1);
    }
}
