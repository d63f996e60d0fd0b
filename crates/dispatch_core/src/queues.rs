//! Pending-order holding areas: an urgent priority queue and a FIFO backlog.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::model::{Order, OrderId};

/// Orders at or above this priority are urgent unless configured otherwise.
pub const DEFAULT_URGENT_THRESHOLD: u32 = 5;

/// Which holding area an order was placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueKind {
    Urgent,
    Backlog,
}

#[derive(Debug)]
struct UrgentEntry {
    priority: u32,
    seq: u64,
    order: Order,
}

impl Ord for UrgentEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap on priority; the earlier sequence number wins a tie.
        self.priority
            .cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for UrgentEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for UrgentEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for UrgentEntry {}

#[derive(Debug)]
pub struct OrderQueues {
    threshold: u32,
    next_seq: u64,
    urgent: BinaryHeap<UrgentEntry>,
    backlog: VecDeque<Order>,
}

impl Default for OrderQueues {
    fn default() -> Self {
        Self::new(DEFAULT_URGENT_THRESHOLD)
    }
}

impl OrderQueues {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            next_seq: 0,
            urgent: BinaryHeap::new(),
            backlog: VecDeque::new(),
        }
    }

    /// Place `order` by priority and report where it went.
    pub fn push(&mut self, order: Order) -> QueueKind {
        if order.priority >= self.threshold {
            self.push_urgent(order);
            QueueKind::Urgent
        } else {
            self.backlog.push_back(order);
            QueueKind::Backlog
        }
    }

    /// Add to the urgent queue regardless of priority; behind any urgent
    /// order of the same priority already queued.
    pub fn push_urgent(&mut self, order: Order) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.urgent.push(UrgentEntry {
            priority: order.priority,
            seq,
            order,
        });
    }

    /// Append to the backlog regardless of priority.
    pub fn push_backlog(&mut self, order: Order) {
        self.backlog.push_back(order);
    }

    /// Highest priority, earliest inserted urgent order.
    pub fn pop_urgent(&mut self) -> Option<Order> {
        self.urgent.pop().map(|entry| entry.order)
    }

    pub fn pop_backlog(&mut self) -> Option<Order> {
        self.backlog.pop_front()
    }

    pub fn urgent_len(&self) -> usize {
        self.urgent.len()
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urgent.is_empty() && self.backlog.is_empty()
    }

    /// Backlog orders, head first.
    pub fn backlog_orders(&self) -> Vec<&Order> {
        self.backlog.iter().collect()
    }

    /// Urgent orders in dequeue order.
    pub fn urgent_orders(&self) -> Vec<&Order> {
        let mut entries: Vec<&UrgentEntry> = self.urgent.iter().collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries.into_iter().map(|entry| &entry.order).collect()
    }

    pub fn backlog_ids(&self) -> Vec<OrderId> {
        self.backlog.iter().map(|order| order.id).collect()
    }

    pub fn urgent_ids(&self) -> Vec<OrderId> {
        self.urgent_orders().into_iter().map(|order| order.id).collect()
    }
}
