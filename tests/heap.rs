use msl::{Alloc, Heap, Object, Ref, RootStack};

fn list(heap: &mut Heap, values: &[f64]) -> Ref {
    let mut tail = None;
    for v in values.iter().rev() {
        let number = heap.alloc(Object::number(*v));
        let pair = heap.alloc(Object::pair(Some(number), tail));
        tail = Some(pair);
    }
    tail
}

#[test]
pub fn test_alloc_reuses_freed_slots() {
    let mut h = Heap::new(4);
    let a = h.alloc(Object::number(10.0));
    let b = h.alloc(Object::number(20.0));
    h.alloc(Object::number(30.0));
    h.alloc(Object::number(40.0));
    h.free(a);
    h.free(b);
    let e = h.alloc(Object::number(50.0));
    let f = h.alloc(Object::number(60.0));

    assert_eq!(h.occupied(), 4);
    assert_eq!(e, b, "most recently freed slot is reused first");
    assert_eq!(f, a);
}

#[test]
pub fn test_collect_reclaims_unreachable() {
    let mut h = Heap::new(8);
    for i in 0..10 {
        h.alloc(Object::number(i as f64));
    }
    assert_eq!(h.occupied(), 10);

    let stats = h.collect();
    assert_eq!(stats.kept, 0);
    assert_eq!(stats.reclaimed, 10);
    assert_eq!(h.occupied(), 0);
}

#[test]
pub fn test_collect_keeps_reachable() {
    let mut h = Heap::new(8);
    let chain = list(&mut h, &[1.0, 2.0, 3.0]);
    h.alloc(Object::number(99.0));
    h.push(chain);

    let stats = h.collect();
    assert_eq!(stats.kept, 6);
    assert_eq!(stats.reclaimed, 1);
    assert_eq!(h.occupied(), 6);
    assert_eq!(h.describe(chain), "(1 2 3)");
}

#[test]
pub fn test_marks_cleared_after_collect() {
    let mut h = Heap::new(8);
    let number = h.alloc(Object::number(1.0));
    let pair = h.alloc(Object::pair(Some(number), None));
    h.push(Some(pair));

    h.collect();
    assert!(!h.access(number).marked());
    assert!(!h.access(pair).marked());
}

#[test]
pub fn test_collect_is_idempotent() {
    let mut h = Heap::new(8);
    let chain = list(&mut h, &[1.0, 2.0]);
    h.alloc(Object::text("garbage"));
    h.push(chain);

    let first = h.collect();
    assert_eq!(first.reclaimed, 1);

    let second = h.collect();
    assert_eq!(second.kept, first.kept);
    assert_eq!(second.reclaimed, 0);
    assert_eq!(h.occupied(), 4);
}

#[test]
pub fn test_self_referential_pair() {
    let mut h = Heap::new(8);
    let pair = h.alloc(Object::pair(None, None));
    match h.access_mut(pair) {
        Object::Pair {
            mark: _,
            head,
            tail,
        } => {
            *head = Some(pair);
            *tail = Some(pair);
        }
        _ => unreachable!(),
    }
    h.push(Some(pair));

    let stats = h.collect();
    assert_eq!(stats.kept, 1);
    assert!(!h.access(pair).marked());

    h.pop();
    h.collect();
    assert_eq!(h.occupied(), 0);
}

#[test]
pub fn test_mutually_referential_pairs() {
    let mut h = Heap::new(8);
    let a = h.alloc(Object::pair(None, None));
    let b = h.alloc(Object::pair(None, Some(a)));
    match h.access_mut(a) {
        Object::Pair { mark: _, head: _, tail } => *tail = Some(b),
        _ => unreachable!(),
    }
    h.push(Some(a));

    let stats = h.collect();
    assert_eq!(stats.kept, 2);
    assert_eq!(h.occupied(), 2);

    h.pop();
    h.collect();
    assert_eq!(h.occupied(), 0);
}

#[test]
pub fn test_cycle_through_array() {
    let mut h = Heap::new(8);
    let array = h.alloc(Object::array());
    h.append(array, Some(array));
    h.push(Some(array));

    let stats = h.collect();
    assert_eq!(stats.kept, 1);
    assert_eq!(h.occupied(), 1);
}

#[test]
pub fn test_stack_churn_scenario() {
    let mut h = Heap::new(8);
    let first = list(&mut h, &[1.0, 2.0, 3.0]);
    h.push(first);
    let four = h.alloc(Object::number(4.0));
    h.push(Some(four));
    let second = list(&mut h, &[5.0, 6.0, 7.0]);
    h.push(second);
    h.pop();
    h.pop();
    let eight = h.alloc(Object::number(8.0));
    h.push(Some(eight));
    assert_eq!(h.occupied(), 14);

    let stats = h.collect();
    assert_eq!(stats.kept, 7);
    assert_eq!(stats.reclaimed, 7);
    assert_eq!(h.occupied(), 7);
    assert_eq!(h.describe(first), "(1 2 3)");
    assert_eq!(h.describe(Some(eight)), "8");
}

#[test]
pub fn test_array_slot_overwrite_drops_reference() {
    let mut h = Heap::new(8);
    let array = h.alloc(Object::array());
    for v in [10.0, 20.0, 30.0] {
        let number = h.alloc(Object::number(v));
        h.append(array, Some(number));
    }
    h.set(array, 1, None);
    h.push(Some(array));
    h.push(None);

    let stats = h.collect();
    assert_eq!(stats.kept, 3);
    assert_eq!(stats.reclaimed, 1);
    assert_eq!(h.describe(Some(array)), "[10, null, 30]");
}

#[test]
pub fn test_array_growth_preserves_elements() {
    let mut h = Heap::new(8);
    let array = h.alloc(Object::array());
    h.push(Some(array));
    for i in 0..40 {
        let number = h.alloc(Object::number(i as f64));
        h.append(array, Some(number));
    }
    assert_eq!(h.array_len(array), 40);

    h.collect();
    assert_eq!(h.occupied(), 41);
    for i in 0..40 {
        let element = h.get(array, i).unwrap();
        match h.access(element) {
            Object::Number { mark: _, value } => assert_eq!(*value, i as f64),
            _ => unreachable!(),
        }
    }
}

#[test]
pub fn test_describe_values() {
    let mut h = Heap::new(8);
    let whole = h.alloc(Object::number(4.0));
    let fractional = h.alloc(Object::number(2.5));
    let text = h.alloc(Object::text("hello"));

    assert_eq!(h.describe(Some(whole)), "4");
    assert_eq!(h.describe(Some(fractional)), "2.5");
    assert_eq!(h.describe(Some(text)), "\"hello\"");
    assert_eq!(h.describe(None), "null");
}

#[test]
pub fn test_describe_pairs() {
    let mut h = Heap::new(8);
    let one = h.alloc(Object::number(1.0));
    let two = h.alloc(Object::number(2.0));
    let three = h.alloc(Object::number(3.0));

    let dotted = h.alloc(Object::pair(Some(one), Some(two)));
    assert_eq!(h.describe(Some(dotted)), "(1 . 2)");

    let single = h.alloc(Object::pair(Some(one), None));
    assert_eq!(h.describe(Some(single)), "(1)");

    let improper = h.alloc(Object::pair(Some(two), Some(three)));
    let improper = h.alloc(Object::pair(Some(one), Some(improper)));
    assert_eq!(h.describe(Some(improper)), "(1 2 . 3)");
}

#[test]
pub fn test_describe_array() {
    let mut h = Heap::new(8);
    let array = h.alloc(Object::array());
    assert_eq!(h.describe(Some(array)), "[]");

    let one = h.alloc(Object::number(1.0));
    let text = h.alloc(Object::text("x"));
    h.append(array, Some(one));
    h.append(array, None);
    h.append(array, Some(text));
    assert_eq!(h.describe(Some(array)), "[1, null, \"x\"]");
}

#[test]
pub fn test_root_stack_lifo() {
    let mut stack = RootStack::new(4);
    stack.push(Some(1));
    stack.push(None);
    stack.push(Some(2));

    assert_eq!(stack.len(), 3);
    assert_eq!(stack.peek(), Some(2));
    assert_eq!(stack.pop(), Some(2));
    assert_eq!(stack.pop(), None);
    assert_eq!(stack.pop(), Some(1));
    assert!(stack.is_empty());
}

#[test]
#[should_panic(expected = "root stack overflow")]
pub fn test_root_stack_overflow() {
    let mut stack = RootStack::new(4);
    for _ in 0..5 {
        stack.push(None);
    }
}

#[test]
#[should_panic(expected = "root stack underflow")]
pub fn test_root_stack_underflow() {
    let mut stack = RootStack::new(4);
    stack.pop();
}

#[test]
#[should_panic(expected = "root stack underflow")]
pub fn test_heap_pop_on_empty_stack() {
    let mut h = Heap::new(4);
    h.pop();
}
