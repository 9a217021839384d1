use super::{
    object::{Object, Ref},
    stack::{RootStack, STACK_CAPACITY},
};

/// Per-cycle outcome of the sweep phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub kept: usize,
    pub reclaimed: usize,
}

pub trait Alloc<P> {
    fn access(&self, ptr: P) -> &Object;

    fn access_mut(&mut self, ptr: P) -> &mut Object;

    fn alloc(&mut self, object: Object) -> P;

    fn free(&mut self, ptr: P);
}

/// The heap: a slot arena registering every live allocation, a free list
/// threaded through reclaimed slots, and the root stack the collector
/// traces from. One `Heap` is one independent collected world; nothing in
/// it is global.
///
/// Slots are index-stable, so a `usize` returned by `alloc` stays valid
/// until a collection cycle finds the object unreachable. Only the sweep
/// phase frees.
pub struct Heap {
    slots: Vec<Object>,
    occupied: usize,
    head: usize,
    roots: RootStack,
    verbose: bool,
}

impl Heap {
    pub fn new(capacity: usize) -> Self {
        Self {
            head: 0,
            occupied: 0,
            slots: (0..capacity).map(|i| Object::free_slot(i + 1)).collect(),
            roots: RootStack::new(STACK_CAPACITY),
            verbose: false,
        }
    }

    /// Print a keep/reclaim line for every slot the sweep phase visits.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Number of allocations the registry currently holds.
    pub fn occupied(&self) -> usize {
        self.occupied
    }

    pub fn roots(&self) -> &RootStack {
        &self.roots
    }

    pub fn push(&mut self, reference: Ref) {
        self.roots.push(reference);
    }

    pub fn pop(&mut self) -> Ref {
        self.roots.pop()
    }

    pub fn peek(&self) -> Ref {
        self.roots.peek()
    }

    /// Append an element to an array object, growing its buffer
    /// geometrically. Amortised O(1).
    ///
    /// Precondition: `array` references an `Object::Array`.
    pub fn append(&mut self, array: usize, element: Ref) {
        match self.access_mut(array) {
            Object::Array { mark: _, vec } => vec.push(element),
            o => panic!("append target is not an array: {}", o.type_name()),
        }
    }

    /// Precondition: `array` references an `Object::Array` and `index` is
    /// within its length.
    pub fn get(&self, array: usize, index: usize) -> Ref {
        match self.access(array) {
            Object::Array { mark: _, vec } => vec[index],
            o => panic!("get target is not an array: {}", o.type_name()),
        }
    }

    /// Precondition: `array` references an `Object::Array` and `index` is
    /// within its length.
    pub fn set(&mut self, array: usize, index: usize, element: Ref) {
        match self.access_mut(array) {
            Object::Array { mark: _, vec } => vec[index] = element,
            o => panic!("set target is not an array: {}", o.type_name()),
        }
    }

    /// Precondition: `array` references an `Object::Array`.
    pub fn array_len(&self, array: usize) -> usize {
        match self.access(array) {
            Object::Array { mark: _, vec } => vec.len(),
            o => panic!("length target is not an array: {}", o.type_name()),
        }
    }

    /// One full stop-the-world cycle: mark everything reachable from the
    /// root stack, then reclaim everything that was not. No other heap or
    /// root mutation may happen until this returns. Calling it again with
    /// no intervening mutation reclaims nothing.
    pub fn collect(&mut self) -> SweepStats {
        self.mark();
        self.sweep()
    }

    /// Flag every object transitively reachable from the root stack. The
    /// traversal runs on an explicit worklist, so its memory is bounded by
    /// the live graph rather than by native stack depth.
    fn mark(&mut self) {
        // Marked slots are skipped; this is the sole guard that keeps
        // reference cycles from looping the traversal forever.
        let mut pending: Vec<usize> = self.roots.iter().filter_map(|r| *r).collect();

        while let Some(ptr) = pending.pop() {
            if self.slots[ptr].marked() {
                continue;
            }

            self.slots[ptr].mark();

            match &self.slots[ptr] {
                Object::Pair {
                    mark: _,
                    head,
                    tail,
                } => pending.extend(head.iter().chain(tail.iter()).copied()),
                Object::Array { mark: _, vec } => pending.extend(vec.iter().flatten().copied()),
                _ => {}
            }
        }
    }

    /// Visit every slot once: marked objects survive with their mark
    /// cleared for the next cycle, unmarked objects go back on the free
    /// list. Replacing the slot drops the object's owned buffers.
    fn sweep(&mut self) -> SweepStats {
        let mut stats = SweepStats {
            kept: 0,
            reclaimed: 0,
        };

        for ptr in 0..self.slots.len() {
            if let Object::Free { next: _ } = self.slots[ptr] {
                continue;
            }

            if self.slots[ptr].marked() {
                if self.verbose {
                    println!("gc keeping H({}) = {}", ptr, self.describe(Some(ptr)));
                }
                self.slots[ptr].unmark();
                stats.kept += 1;
            } else {
                if self.verbose {
                    println!("gc reclaiming H({}) = {}", ptr, self.describe(Some(ptr)));
                }
                self.free(ptr);
                stats.reclaimed += 1;
            }
        }

        stats
    }

    /// Render a reference in human-readable form: numbers in shortest
    /// round-trip decimal, text quoted, arrays `[a, b, c]`, pair chains
    /// lisp-style with a dotted improper tail, absent values as `null`.
    ///
    /// Purely observational. Does not guard against reference cycles, so
    /// keep it away from cyclic structures.
    pub fn describe(&self, reference: Ref) -> String {
        let ptr = match reference {
            Some(ptr) => ptr,
            None => return "null".to_string(),
        };

        match self.access(ptr) {
            Object::Number { mark: _, value } => format!("{}", value),
            Object::Text { mark: _, text } => format!("\"{}\"", text),
            Object::Array { mark: _, vec } => format!(
                "[{}]",
                vec.iter()
                    .map(|r| self.describe(*r))
                    .collect::<Vec<String>>()
                    .join(", ")
            ),
            Object::Pair {
                mark: _,
                head,
                tail,
            } => {
                let mut out = format!("({}", self.describe(*head));
                let mut rest = *tail;
                while let Some(p) = rest {
                    match self.access(p) {
                        Object::Pair {
                            mark: _,
                            head,
                            tail,
                        } => {
                            out.push(' ');
                            out.push_str(&self.describe(*head));
                            rest = *tail;
                        }
                        _ => {
                            out.push_str(" . ");
                            out.push_str(&self.describe(rest));
                            break;
                        }
                    }
                }
                out.push(')');
                out
            }
            Object::Free { next: _ } => unreachable!("reference into a freed slot"),
        }
    }

    pub fn dump(&self) {
        println!("Heap Dump {:p} head = {}", self, self.head);
        for (i, item) in self.slots.iter().enumerate() {
            println!("H({}) = {:?}", i, item);
        }
    }
}

impl Alloc<usize> for Heap {
    fn alloc(&mut self, object: Object) -> usize {
        if let Object::Free { next: _ } = object {
            unreachable!("should allocate a value, not a free slot");
        }

        let size = self.slots.len();
        if self.head >= size {
            self.slots
                .extend((size..2 * size).map(|i| Object::free_slot(i + 1)));
        }

        let pos = self.head;
        self.head = match self.slots[pos] {
            Object::Free { next } => next,
            _ => unreachable!("free-list head points at an occupied slot"),
        };

        self.slots[pos] = object;
        self.occupied += 1;
        pos
    }

    fn free(&mut self, ptr: usize) {
        match self.slots[ptr] {
            Object::Free { next: _ } => {}
            _ => {
                self.slots[ptr] = Object::free_slot(self.head);
                self.head = ptr;
                self.occupied -= 1;
            }
        }
    }

    fn access(&self, ptr: usize) -> &Object {
        &self.slots[ptr]
    }

    fn access_mut(&mut self, ptr: usize) -> &mut Object {
        &mut self.slots[ptr]
    }
}
