//! Doubly linked node lists stored in an arena.
//!
//! Nodes never move once allocated, so a [`NodeRef`] stays valid for the
//! lifetime of the arena. Links between nodes are plain indices, which lets a
//! stop marker point back at its start marker without shared ownership.

use crate::node::{Node, NodeKind};
use std::collections::HashMap;
use std::fmt;

/// Handle to a node inside a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeRef(u32);

impl NodeRef {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct Slot {
    node: Node,
    prev: Option<NodeRef>,
    next: Option<NodeRef>,
}

/// Owns every node of a document. Lists are chains of slots.
#[derive(Debug, Default)]
pub struct NodeArena {
    slots: Vec<Slot>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocates an unlinked node. Its id is taken from the global counter.
    pub fn alloc(&mut self, kind: impl Into<NodeKind>) -> NodeRef {
        let r = NodeRef(self.slots.len() as u32);
        self.slots.push(Slot {
            node: Node::new(kind),
            prev: None,
            next: None,
        });
        r
    }

    pub fn get(&self, r: NodeRef) -> &Node {
        &self.slots[r.index()].node
    }

    pub fn get_mut(&mut self, r: NodeRef) -> &mut Node {
        &mut self.slots[r.index()].node
    }

    pub fn next(&self, r: NodeRef) -> Option<NodeRef> {
        self.slots[r.index()].next
    }

    pub fn prev(&self, r: NodeRef) -> Option<NodeRef> {
        self.slots[r.index()].prev
    }

    /// Walks the list starting at `head`.
    pub fn iter(&self, head: Option<NodeRef>) -> ListIter<'_> {
        ListIter { arena: self, cur: head }
    }

    /// The last node of the list `r` belongs to, searching forward.
    pub fn tail(&self, r: NodeRef) -> NodeRef {
        let mut cur = r;
        while let Some(next) = self.next(cur) {
            cur = next;
        }
        cur
    }

    /// Number of nodes from `head` to the end of its list.
    pub fn list_len(&self, head: Option<NodeRef>) -> usize {
        self.iter(head).count()
    }

    /// Inserts the chain starting at `ins` after `cur` and returns the new
    /// head of the list. With `cur == None` the chain is prepended to `head`.
    pub fn insert_after(
        &mut self,
        head: Option<NodeRef>,
        cur: Option<NodeRef>,
        ins: NodeRef,
    ) -> NodeRef {
        let ins_tail = self.tail(ins);
        match cur {
            None => {
                if let Some(h) = head {
                    self.slots[ins_tail.index()].next = Some(h);
                    self.slots[h.index()].prev = Some(ins_tail);
                }
                self.slots[ins.index()].prev = None;
                ins
            }
            Some(c) => {
                let after = self.slots[c.index()].next;
                self.slots[c.index()].next = Some(ins);
                self.slots[ins.index()].prev = Some(c);
                self.slots[ins_tail.index()].next = after;
                if let Some(a) = after {
                    self.slots[a.index()].prev = Some(ins_tail);
                }
                head.unwrap_or(c)
            }
        }
    }

    /// Appends `ins` (and whatever follows it) to `tail`. Returns the new
    /// head and the new tail.
    pub fn append(
        &mut self,
        head: Option<NodeRef>,
        tail: Option<NodeRef>,
        ins: NodeRef,
    ) -> (NodeRef, NodeRef) {
        let head = self.insert_after(head, tail, ins);
        (head, self.tail(ins))
    }

    /// Threads `nodes` into a fresh list in slice order, dropping any links
    /// they had before. Returns the head, `None` for an empty slice.
    pub fn link(&mut self, nodes: &[NodeRef]) -> Option<NodeRef> {
        let mut prev: Option<NodeRef> = None;
        for &r in nodes {
            self.slots[r.index()].prev = prev;
            self.slots[r.index()].next = None;
            if let Some(p) = prev {
                self.slots[p.index()].next = Some(r);
            }
            prev = Some(r);
        }
        nodes.first().copied()
    }

    /// Copies the list starting at `head` into fresh, unlinked slots and
    /// returns the copy's head and tail. The original list is left as it is.
    ///
    /// Box sublists are copied along. A stop whose start lies inside the copied
    /// list points at the copied start.
    pub fn copy_list(&mut self, head: NodeRef) -> (NodeRef, NodeRef) {
        let mut copies = HashMap::new();
        let copy = self.copy_chain(head, &mut copies);
        (copy, self.tail(copy))
    }

    fn copy_chain(&mut self, head: NodeRef, copies: &mut HashMap<NodeRef, NodeRef>) -> NodeRef {
        let originals: Vec<NodeRef> = self.iter(Some(head)).collect();
        let mut fresh = Vec::with_capacity(originals.len());
        for r in originals {
            let mut kind = self.get(r).kind.clone();
            match &mut kind {
                NodeKind::HList(b) => b.list = b.list.map(|l| self.copy_chain(l, copies)),
                NodeKind::VList(b) => b.list = b.list.map(|l| self.copy_chain(l, copies)),
                NodeKind::StartStop(s) => {
                    s.start = s.start.map(|st| copies.get(&st).copied().unwrap_or(st))
                }
                _ => {}
            }
            let attributes = self.get(r).attributes.clone();
            let copy = self.alloc(kind);
            self.get_mut(copy).attributes = attributes;
            copies.insert(r, copy);
            fresh.push(copy);
        }
        self.link(&fresh);
        fresh[0]
    }

    /// Unlinks `r` from its neighbours and returns the new head.
    pub fn delete(&mut self, head: NodeRef, r: NodeRef) -> Option<NodeRef> {
        let prev = self.slots[r.index()].prev.take();
        let next = self.slots[r.index()].next.take();
        if let Some(p) = prev {
            self.slots[p.index()].next = next;
        }
        if let Some(n) = next {
            self.slots[n.index()].prev = prev;
        }
        if head == r { next } else { Some(head) }
    }
}

pub struct ListIter<'a> {
    arena: &'a NodeArena,
    cur: Option<NodeRef>,
}

impl Iterator for ListIter<'_> {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let cur = self.cur?;
        self.cur = self.arena.next(cur);
        Some(cur)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Disc, HList, Kern, Penalty, StartStop};

    fn names(arena: &NodeArena, head: Option<NodeRef>) -> Vec<&'static str> {
        arena.iter(head).map(|r| arena.get(r).name()).collect()
    }

    #[test]
    fn test_append_builds_list_in_order() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(Disc);
        let b = arena.alloc(Kern::default());
        let c = arena.alloc(Penalty::default());
        let (head, tail) = arena.append(None, None, a);
        let (head, tail) = arena.append(Some(head), Some(tail), b);
        let (head, tail) = arena.append(Some(head), Some(tail), c);
        assert_eq!(head, a);
        assert_eq!(tail, c);
        assert_eq!(names(&arena, Some(head)), vec!["disc", "kern", "penalty"]);
        assert_eq!(arena.prev(c), Some(b));
    }

    #[test]
    fn test_insert_chain_in_the_middle() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(Disc);
        let d = arena.alloc(Disc);
        let head = arena.insert_after(None, None, a);
        let head = arena.insert_after(Some(head), Some(a), d);

        let b = arena.alloc(Kern::default());
        let c = arena.alloc(Penalty::default());
        arena.insert_after(Some(b), Some(b), c);

        let head = arena.insert_after(Some(head), Some(a), b);
        assert_eq!(names(&arena, Some(head)), vec!["disc", "kern", "penalty", "disc"]);
        assert_eq!(arena.prev(d), Some(c));
        assert_eq!(arena.tail(head), d);
    }

    #[test]
    fn test_prepend() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(Disc);
        let b = arena.alloc(Kern::default());
        let head = arena.insert_after(Some(a), None, b);
        assert_eq!(head, b);
        assert_eq!(names(&arena, Some(head)), vec!["kern", "disc"]);
    }

    #[test]
    fn test_link_rethreads_slice() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(Disc);
        let b = arena.alloc(Kern::default());
        let c = arena.alloc(Penalty::default());
        let head = arena.link(&[a, b, c]);
        let head = arena.link(&[c, a]).or(head);
        assert_eq!(head, Some(c));
        assert_eq!(names(&arena, head), vec!["penalty", "disc"]);
        assert!(arena.link(&[]).is_none());
    }

    #[test]
    fn test_copy_list_leaves_original_alone() {
        let mut arena = NodeArena::new();
        let start = arena.alloc(StartStop::default());
        let inner = arena.alloc(Kern::default());
        let boxed = arena.alloc(HList {
            list: Some(inner),
            ..Default::default()
        });
        let stop = arena.alloc(StartStop::stop(start));
        let head = arena.link(&[start, boxed, stop]).unwrap();
        let after = arena.alloc(Disc);
        arena.insert_after(Some(head), Some(stop), after);

        let (copy, copy_tail) = arena.copy_list(start);
        assert_ne!(copy, start);
        assert_eq!(names(&arena, Some(copy)), vec!["startstop", "hlist", "startstop", "disc"]);
        assert_eq!(arena.prev(copy), None);
        assert!(arena.get(copy).id > arena.get(after).id);

        // The copied stop points at the copied start, the box at a copied sublist.
        let copied_stop = arena.prev(copy_tail).unwrap();
        assert_eq!(arena.get(copied_stop).as_start_stop().unwrap().start, Some(copy));
        let copied_box = arena.next(copy).unwrap();
        let copied_inner = arena.get(copied_box).as_hlist().unwrap().list.unwrap();
        assert_ne!(copied_inner, inner);
        assert_eq!(arena.get(copied_inner).name(), "kern");

        assert_eq!(arena.next(stop), Some(after));
        assert_eq!(arena.next(after), None);
        assert_eq!(arena.get(stop).as_start_stop().unwrap().start, Some(start));
    }

    #[test]
    fn test_delete_head_and_middle() {
        let mut arena = NodeArena::new();
        let a = arena.alloc(Disc);
        let b = arena.alloc(Kern::default());
        let c = arena.alloc(Penalty::default());
        let (head, tail) = arena.append(None, None, a);
        let (head, tail) = arena.append(Some(head), Some(tail), b);
        let (head, _) = arena.append(Some(head), Some(tail), c);

        let head = arena.delete(head, b).unwrap();
        assert_eq!(names(&arena, Some(head)), vec!["disc", "penalty"]);
        let head = arena.delete(head, a);
        assert_eq!(head, Some(c));
        assert_eq!(arena.prev(c), None);
    }
}
