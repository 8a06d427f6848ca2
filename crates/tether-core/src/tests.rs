#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeSet;
    use std::fmt;
    use std::rc::Rc;

    use crate::prelude::*;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Wraps a provider and records how it is read.
    struct Recording<T: 'static> {
        inner: ProviderRef<T>,
        calls: Rc<Cell<usize>>,
        consumers: Rc<RefCell<Vec<ValueConsumer>>>,
    }

    struct Recorded<T: 'static> {
        provider: ProviderRef<T>,
        calls: Rc<Cell<usize>>,
        consumers: Rc<RefCell<Vec<ValueConsumer>>>,
    }

    fn recording<T: 'static>(inner: ProviderRef<T>) -> Recorded<T> {
        let calls = Rc::new(Cell::new(0));
        let consumers = Rc::new(RefCell::new(Vec::new()));
        let provider: ProviderRef<T> = Rc::new(Recording {
            inner,
            calls: calls.clone(),
            consumers: consumers.clone(),
        });
        Recorded {
            provider,
            calls,
            consumers,
        }
    }

    impl<T: 'static> Provider<T> for Recording<T> {
        fn value_type(&self) -> TypeDescriptor {
            self.inner.value_type()
        }

        fn calculate_value(&self, consumer: ValueConsumer) -> Value<T> {
            self.calls.set(self.calls.get() + 1);
            self.consumers.borrow_mut().push(consumer);
            self.inner.calculate_value(consumer)
        }

        fn calculate_execution_time_value(&self) -> ExecutionTimeValue<T> {
            self.inner.calculate_execution_time_value()
        }

        fn producer(&self) -> ValueProducer {
            self.inner.producer()
        }
    }

    impl<T: 'static> fmt::Display for Recording<T> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "recording({})", self.inner)
        }
    }

    /// Panics if anything tries to read it.
    struct Exploding;

    impl Provider<i32> for Exploding {
        fn value_type(&self) -> TypeDescriptor {
            TypeDescriptor::of::<i32>()
        }

        fn calculate_value(&self, _consumer: ValueConsumer) -> Value<i32> {
            panic!("exploding provider was read");
        }
    }

    impl fmt::Display for Exploding {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("exploding")
        }
    }

    /// Always missing, with a diagnostic path.
    struct MissingWithPath(&'static str);

    impl Provider<i32> for MissingWithPath {
        fn value_type(&self) -> TypeDescriptor {
            TypeDescriptor::of::<i32>()
        }

        fn calculate_value(&self, _consumer: ValueConsumer) -> Value<i32> {
            Value::missing().push_when_missing(self.0)
        }
    }

    impl fmt::Display for MissingWithPath {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "missing({})", self.0)
        }
    }

    /// Present, but only fixed for the current evaluation.
    struct PerRun(i32);

    impl Provider<i32> for PerRun {
        fn value_type(&self) -> TypeDescriptor {
            TypeDescriptor::of::<i32>()
        }

        fn calculate_value(&self, _consumer: ValueConsumer) -> Value<i32> {
            Value::of(self.0)
        }

        fn calculate_execution_time_value(&self) -> ExecutionTimeValue<i32> {
            ExecutionTimeValue::fixed(self.0).with_changing_content()
        }
    }

    impl fmt::Display for PerRun {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "perRun({})", self.0)
        }
    }

    type Trace = Rc<RefCell<Vec<(&'static str, i32)>>>;

    fn new_trace() -> Trace {
        Rc::new(RefCell::new(Vec::new()))
    }

    /// A fixed provider whose side effect records `(tag, value)`.
    fn traced(trace: &Trace, tag: &'static str, value: i32) -> ProviderRef<i32> {
        let trace = trace.clone();
        let effect = SideEffect::new(move |v: &i32| {
            trace.borrow_mut().push((tag, *v));
        });
        providers::with_side_effect(providers::fixed(value), effect)
    }

    #[test]
    fn test_zip_present_inputs() {
        init_logging();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let left = providers::fixed(3);
        let right = providers::fixed(4);
        let sum = {
            let seen = seen.clone();
            left.zip(&right, move |a, b| {
                seen.borrow_mut().push((*a, *b));
                a + b
            })
        };

        let value = sum.calculate_value(ValueConsumer::default());
        assert_eq!(value.get_without_side_effect(), Ok(&7));
        assert!(value.side_effect().is_none());
        assert_eq!(*seen.borrow(), vec![(3, 4)]);
    }

    #[test]
    fn test_zip_missing_left_skips_right() {
        init_logging();
        let calls = Rc::new(Cell::new(0));
        let left = providers::not_defined::<i32>();
        let right: ProviderRef<i32> = Rc::new(Exploding);
        let sum = {
            let calls = calls.clone();
            left.zip(&right, move |a, b| {
                calls.set(calls.get() + 1);
                a + b
            })
        };

        let value = sum.calculate_value(ValueConsumer::default());
        assert!(value.is_missing());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_zip_missing_right() {
        let calls = Rc::new(Cell::new(0));
        let left = recording(providers::fixed(3));
        let right = providers::not_defined::<i32>();
        let sum = {
            let calls = calls.clone();
            left.provider.zip(&right, move |a, b| {
                calls.set(calls.get() + 1);
                a + b
            })
        };

        let value = sum.calculate_value(ValueConsumer::default());
        assert!(value.is_missing());
        assert_eq!(calls.get(), 0);
        assert_eq!(left.calls.get(), 1);
    }

    #[test]
    fn test_zip_keeps_missing_path() {
        let left: ProviderRef<i32> = Rc::new(MissingWithPath("property 'left'"));
        let sum = left.zip(&providers::fixed(1), |a, b| a + b);

        let value = sum.calculate_value(ValueConsumer::default());
        assert_eq!(value.path_to_origin(), ["property 'left'"]);

        let err = sum.get().unwrap_err();
        assert_eq!(
            err.description,
            "and(missing(property 'left'), fixed(i32, 1))"
        );
        assert_eq!(err.path, ["property 'left'"]);
    }

    #[test]
    fn test_zip_reads_each_input_once() {
        let left = recording(providers::fixed(3));
        let right = recording(providers::fixed(4));
        let sum = left.provider.zip(&right.provider, |a, b| a + b);
        let strict = vec![ValueConsumer::DisallowUnsafeRead];

        let _ = sum.calculate_value(ValueConsumer::DisallowUnsafeRead);
        assert_eq!(left.calls.get(), 1);
        assert_eq!(right.calls.get(), 1);
        assert_eq!(*left.consumers.borrow(), strict);
        assert_eq!(*right.consumers.borrow(), strict);

        let _ = sum.calculate_value(ValueConsumer::IgnoreUnsafeRead);
        assert_eq!(left.calls.get(), 2);
        assert_eq!(right.calls.get(), 2);
    }

    #[test]
    fn test_zip_side_effects_run_left_then_right_on_consumption() {
        init_logging();
        let trace = new_trace();
        let left = traced(&trace, "left", 3);
        let right = traced(&trace, "right", 4);
        let product = left.zip(&right, |a, b| a * b);

        let value = product.calculate_value(ValueConsumer::default());
        assert_eq!(value.side_effect().map(SideEffect::len), Some(2));
        assert!(trace.borrow().is_empty());

        assert_eq!(value.get(), Ok(12));
        // Each effect fires with the value it was attached to.
        assert_eq!(*trace.borrow(), vec![("left", 3), ("right", 4)]);
    }

    #[test]
    fn test_zip_single_side_effect() {
        let trace = new_trace();
        let left = providers::fixed(3);
        let right = traced(&trace, "right", 4);
        let label = left.zip(&right, |a, b| format!("{a}x{b}"));

        let value = label.calculate_value(ValueConsumer::default());
        assert_eq!(value.side_effect().map(SideEffect::len), Some(1));
        assert_eq!(value.get(), Ok("3x4".to_string()));
        assert_eq!(*trace.borrow(), vec![("right", 4)]);
    }

    #[test]
    fn test_zip_nested_effects_keep_order() {
        let trace = new_trace();
        let a = traced(&trace, "a", 1);
        let b = traced(&trace, "b", 2);
        let c = traced(&trace, "c", 3);

        let sum = a.zip(&b, |x, y| x + y).zip(&c, |xy, z| xy + z);
        assert_eq!(sum.get(), Ok(6));
        assert_eq!(*trace.borrow(), vec![("a", 1), ("b", 2), ("c", 3)]);
    }

    #[test]
    fn test_zip_nested_display() {
        let a = providers::fixed(1);
        let b = providers::fixed(2);
        let c = providers::fixed(3);

        let sum = a.zip(&b, |x, y| x + y).zip(&c, |xy, z| xy + z);
        assert_eq!(
            sum.to_string(),
            "and(and(fixed(i32, 1), fixed(i32, 2)), fixed(i32, 3))"
        );
    }

    #[test]
    fn test_zip_repeated_compute_is_structurally_equal() {
        let trace = new_trace();
        let left = traced(&trace, "left", 3);
        let sum = left.zip(&providers::fixed(4), |a, b| a + b);

        let first = sum.calculate_value(ValueConsumer::default());
        let second = sum.calculate_value(ValueConsumer::default());
        assert_eq!(
            first.get_without_side_effect(),
            second.get_without_side_effect()
        );
        assert_eq!(
            first.side_effect().map(SideEffect::len),
            second.side_effect().map(SideEffect::len)
        );

        assert_eq!(first.get(), Ok(7));
        assert_eq!(second.get(), Ok(7));
        assert_eq!(*trace.borrow(), vec![("left", 3), ("left", 3)]);
    }

    #[test]
    fn test_zip_passes_empty_payload_through() {
        let left = providers::fixed(None::<i32>);
        let right = providers::fixed(Some(5));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let merged = {
            let seen = seen.clone();
            left.zip(&right, move |a, b| {
                seen.borrow_mut().push((*a, *b));
                a.or(*b)
            })
        };

        assert_eq!(merged.get(), Ok(Some(5)));
        assert_eq!(*seen.borrow(), vec![(None, Some(5))]);
    }

    fn explode(_: &i32, _: &i32) -> i32 {
        panic!("combine failed");
    }

    #[test]
    #[should_panic(expected = "combine failed")]
    fn test_zip_combine_panic_propagates() {
        let left = providers::fixed(1);
        let right = providers::fixed(2);
        let broken = left.zip(&right, explode);
        let _ = broken.calculate_value(ValueConsumer::default());
    }

    #[test]
    fn test_zip_get_or_none() {
        let three = providers::fixed(3);
        let four = providers::fixed(4);
        let undefined = providers::not_defined::<i32>();

        let present = three.zip(&four, |a, b| a + b);
        assert_eq!(present.get_or_none(), Some(7));

        let missing = three.zip(&undefined, |a, b| a + b);
        assert_eq!(missing.get_or_none(), None);
    }

    #[test]
    fn test_zip_execution_time_value_fixed() {
        let left = providers::fixed(3);
        let right = providers::fixed(4);
        let sum = left.zip(&right, |a, b| a + b);

        let execution = sum.calculate_execution_time_value();
        assert!(execution.has_fixed_value());
        assert!(!execution.is_changing_value());
        assert!(!execution.has_changing_content());
        assert_eq!(execution.to_value().get(), Ok(7));
    }

    #[test]
    fn test_zip_execution_time_value_missing() {
        let left = providers::not_defined::<i32>();
        let sum = left.zip(&providers::fixed(4), |a, b| a + b);
        assert!(sum.calculate_execution_time_value().is_missing());
    }

    #[test]
    fn test_zip_changing_content_taints_snapshot() {
        let per_run: ProviderRef<i32> = Rc::new(PerRun(1));
        let fixed = providers::fixed(2);

        for (left, right) in [
            (per_run.clone(), fixed.clone()),
            (fixed.clone(), per_run.clone()),
        ] {
            let sum = left.zip(&right, |a, b| a + b);
            let execution = sum.calculate_execution_time_value();
            assert!(execution.has_fixed_value());
            assert!(execution.has_changing_content());
            assert!(!execution.is_changing_value());
            assert_eq!(execution.to_value().get(), Ok(3));
        }
    }

    #[test]
    fn test_zip_changing_input_taints_result() {
        let counter = Rc::new(Cell::new(10));
        let ticking = {
            let counter = counter.clone();
            providers::changing(move || Some(counter.get()))
        };
        let fixed = providers::fixed(1);

        for (left, right) in [
            (ticking.clone(), fixed.clone()),
            (fixed.clone(), ticking.clone()),
        ] {
            let sum = left.zip(&right, |a, b| a + b);
            match sum.calculate_execution_time_value() {
                ExecutionTimeValue::Changing(provider) => {
                    assert!(Rc::ptr_eq(&provider, &sum));
                }
                other => panic!("expected a changing value, got {other:?}"),
            }
        }

        let sum = ticking.zip(&fixed, |a, b| a + b);
        let execution = sum.calculate_execution_time_value();
        counter.set(20);
        // A changing classification re-reads instead of replaying a snapshot.
        assert_eq!(execution.to_value().get(), Ok(21));
    }

    #[test]
    fn test_zip_producer_is_union() {
        let mut graph = WorkGraph::new();
        let compile = graph.add_task(":compile");
        let jar = graph.add_task(":jar");

        let classes = providers::fixed("classes".to_string());
        let classes = providers::produced_by(compile, classes);
        let archive = providers::fixed("app.jar".to_string());
        let archive = providers::produced_by(jar, archive);

        let forward = classes.zip(&archive, |a, b| format!("{a}+{b}"));
        let backward = archive.zip(&classes, |a, b| format!("{a}+{b}"));
        let forward_tasks = forward.producer().tasks();

        assert_eq!(forward_tasks, BTreeSet::from([compile, jar]));
        assert_eq!(forward_tasks, backward.producer().tasks());
        assert_eq!(graph.describe(&forward.producer()), [":compile", ":jar"]);
        assert!(forward.producer().is_known());
    }

    #[test]
    fn test_zip_type_is_unknown() {
        let left = providers::fixed(3);
        let right = providers::not_defined::<i32>();
        let sum = left.zip(&right, |a, b| a + b);

        assert_eq!(sum.value_type(), TypeDescriptor::Unknown);
        assert!(left.value_type().is_known());
        assert_eq!(sum.to_string(), "and(fixed(i32, 3), undefined)");
    }

    #[test]
    fn test_zip_exposes_inputs() {
        let left = providers::fixed(3);
        let right = providers::fixed("x".to_string());
        let zip = Zip::new(left.clone(), right.clone(), |n, s| s.repeat(*n as usize));

        assert!(Rc::ptr_eq(zip.left(), &left));
        assert!(Rc::ptr_eq(zip.right(), &right));

        let value = zip.calculate_value(ValueConsumer::default());
        assert_eq!(value.get(), Ok("xxx".to_string()));
    }
}
