//! Function timing
//!
//! [`TimedCall`] turns a callable into one with the same signature whose every
//! invocation runs inside a fresh [`Section`](crate::Section) labelled
//! `"<name>()"`. Callables of up to eight arguments are supported.
//!
//! ```ignore
//! let parse = sectime::timed("parse", SectionOptions::default())
//!     .wrap(|input: &str, strict: bool| parse_document(input, strict));
//! let doc = parse("...", true);
//! ```

use crate::section::SectionOptions;
use crate::tracker::Tracker;

#[derive(Debug, Clone)]
pub struct TimedCall {
    tracker: Tracker,
    label: String,
    options: SectionOptions,
}

impl TimedCall {
    pub(crate) fn new(tracker: Tracker, name: String, options: SectionOptions) -> Self {
        Self {
            tracker,
            label: format!("{name}()"),
            options,
        }
    }

    /// Section name used for every invocation.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run `f` once inside a section. The return value passes through as is.
    pub fn call<R>(&self, f: impl FnOnce() -> R) -> R {
        let _section = self
            .tracker
            .section_with(self.label.clone(), self.options.clone());
        f()
    }

    /// Wrap `f` into a callable taking the same arguments and returning the
    /// same value.
    pub fn wrap<'a, Args, F>(self, f: F) -> F::Wrapped
    where
        F: TimedFn<'a, Args>,
    {
        f.into_timed(self)
    }

    pub fn wrap_mut<'a, Args, F>(self, f: F) -> F::Wrapped
    where
        F: TimedFnMut<'a, Args>,
    {
        f.into_timed_mut(self)
    }
}

/// `Fn` callables that [`TimedCall::wrap`] accepts, keyed by argument tuple.
pub trait TimedFn<'a, Args> {
    type Wrapped;

    fn into_timed(self, call: TimedCall) -> Self::Wrapped;
}

/// `FnMut` callables that [`TimedCall::wrap_mut`] accepts.
pub trait TimedFnMut<'a, Args> {
    type Wrapped;

    fn into_timed_mut(self, call: TimedCall) -> Self::Wrapped;
}

macro_rules! impl_timed_fn {
    ($($arg:ident: $Arg:ident),*) => {
        impl<'a, F, R, $($Arg,)*> TimedFn<'a, ($($Arg,)*)> for F
        where
            F: Fn($($Arg),*) -> R + 'a,
            R: 'a,
            $($Arg: 'a,)*
        {
            type Wrapped = Box<dyn Fn($($Arg),*) -> R + 'a>;

            fn into_timed(self, call: TimedCall) -> Self::Wrapped {
                Box::new(move |$($arg: $Arg),*| call.call(|| self($($arg),*)))
            }
        }

        impl<'a, F, R, $($Arg,)*> TimedFnMut<'a, ($($Arg,)*)> for F
        where
            F: FnMut($($Arg),*) -> R + 'a,
            R: 'a,
            $($Arg: 'a,)*
        {
            type Wrapped = Box<dyn FnMut($($Arg),*) -> R + 'a>;

            fn into_timed_mut(mut self, call: TimedCall) -> Self::Wrapped {
                Box::new(move |$($arg: $Arg),*| call.call(|| self($($arg),*)))
            }
        }
    };
}

impl_timed_fn!();
impl_timed_fn!(a: A);
impl_timed_fn!(a: A, b: B);
impl_timed_fn!(a: A, b: B, c: C);
impl_timed_fn!(a: A, b: B, c: C, d: D);
impl_timed_fn!(a: A, b: B, c: C, d: D, e: E);
impl_timed_fn!(a: A, b: B, c: C, d: D, e: E, f: G);
impl_timed_fn!(a: A, b: B, c: C, d: D, e: E, f: G, g: H);
impl_timed_fn!(a: A, b: B, c: C, d: D, e: E, f: G, g: H, h: I);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::scripted_tracker;
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn test_single_function() {
        let (tracker, sink) = scripted_tracker(&[0, 500_000]);
        let single_function = tracker
            .timed("single_function", SectionOptions::default())
            .wrap(|| ());
        single_function();
        assert_eq!(sink.contents(), "->>>>>>>>         500.0ms      single_function()\n");
    }

    #[test]
    fn test_each_call_is_timed_independently() {
        let (tracker, sink) = scripted_tracker(&[0, 500_000, 2_000_000, 3_500_000]);
        let function = tracker.timed("function", SectionOptions::default()).wrap(|| ());
        function();
        function();
        assert_eq!(
            sink.lines(),
            vec![
                "->>>>>>>>         500.0ms      function()",
                "->>>>>>>>        1500.0ms      function()",
            ]
        );
    }

    #[test]
    fn test_arguments_and_return_value_pass_through() {
        let (tracker, sink) = scripted_tracker(&[0, 1_000]);
        let add = tracker
            .timed("add", SectionOptions::default())
            .wrap(|a: i32, b: i32| a + b);
        assert_eq!(add(40, 2), 42);
        assert_eq!(sink.lines(), vec!["->>>>>>>>           1.0ms      add()"]);
    }

    #[test]
    fn test_error_results_are_untouched() {
        let (tracker, sink) = scripted_tracker(&[0, 2_000]);
        let parse = tracker
            .timed("parse", SectionOptions::default())
            .wrap(|text: &str| text.parse::<u32>());
        assert!(parse("not a number").is_err());
        assert_eq!(sink.lines(), vec!["->>>>>>>>           2.0ms      parse()"]);
        assert_eq!(tracker.depth(), -1);
    }

    #[test]
    fn test_wrap_mut_keeps_state() {
        let (tracker, sink) = scripted_tracker(&[0, 1_000, 1_000, 3_000]);
        let mut total = 0;
        {
            let mut accumulate = tracker
                .timed("accumulate", SectionOptions::default())
                .wrap_mut(|n: i32| {
                    total += n;
                    total
                });
            assert_eq!(accumulate(5), 5);
            assert_eq!(accumulate(7), 12);
        }
        assert_eq!(total, 12);
        assert_eq!(
            sink.lines(),
            vec![
                "->>>>>>>>           1.0ms      accumulate()",
                "->>>>>>>>           2.0ms      accumulate()",
            ]
        );
    }

    #[test]
    fn test_nested_functions() {
        let (tracker, sink) = scripted_tracker(&[0, 500_000, 2_000_000, 3_500_000]);
        let function_inner = tracker
            .timed("function_inner", SectionOptions::default())
            .wrap(|| ());
        let function_outer = tracker
            .timed("function_outer", SectionOptions::default())
            .wrap(move || function_inner());
        function_outer();
        assert_eq!(
            sink.lines(),
            vec![
                "->>>>>>>>        1500.0ms      |   function_inner()",
                "->>>>>>>>        3500.0ms      function_outer()",
            ]
        );
    }

    #[test]
    fn test_three_nested_functions() {
        let (tracker, sink) =
            scripted_tracker(&[0, 500_000, 2_000_000, 2_010_100, 2_250_300, 3_500_000]);
        let options = SectionOptions::default();
        let function_inner = tracker.timed("function_inner", options.clone()).wrap(|| ());
        let function_middle = tracker
            .timed("function_middle", options.clone())
            .wrap(move || function_inner());
        let function_outer = tracker
            .timed("function_outer", options)
            .wrap(move || function_middle());
        function_outer();
        assert_eq!(
            sink.lines(),
            vec![
                "->>>>>>>>          10.1ms      |   |   function_inner()",
                "->>>>>>>>        1750.3ms      |   function_middle()",
                "->>>>>>>>        3500.0ms      function_outer()",
            ]
        );
    }

    #[test]
    fn test_nested_functions_and_sections_with_panic() {
        let (tracker, sink) = scripted_tracker(&[
            0, 100_000, 234_000, 500_000, 2_000_000, 2_001_000, 2_001_000, 2_050_000, 2_070_000,
            2_110_100, 2_250_300, 3_500_000,
        ]);
        let options = SectionOptions::default();

        let inner_tracker = tracker.clone();
        let function_inner = tracker.timed("function_inner", options.clone()).wrap(move || {
            drop(inner_tracker.section("function_inner:section_1"));
            let _section = inner_tracker.section("function_inner:section_2");
            panic!("section_2 failed");
        });
        let function_middle = tracker
            .timed("function_middle", options.clone())
            .wrap(move || function_inner());
        let outer_tracker = tracker.clone();
        let function_outer = tracker.timed("function_outer", options).wrap(move || {
            drop(outer_tracker.section("function_outer:section"));
            function_middle()
        });

        let result = panic::catch_unwind(AssertUnwindSafe(|| function_outer()));
        assert!(result.is_err());
        assert_eq!(tracker.depth(), -1);
        assert_eq!(
            sink.lines(),
            vec![
                "->>>>>>>>         134.0ms      |   function_outer:section",
                "->>>>>>>>           0.0ms      |   |   |   function_inner:section_1",
                "->>>>>>>>          20.0ms      |   |   |   function_inner:section_2",
                "->>>>>>>>         110.1ms      |   |   function_inner()",
                "->>>>>>>>        1750.3ms      |   function_middle()",
                "->>>>>>>>        3500.0ms      function_outer()",
            ]
        );
    }

    #[test]
    fn test_extra_text() {
        let (tracker, sink) = scripted_tracker(&[0, 500_000]);
        let function = tracker
            .timed(
                "function",
                SectionOptions::new().extra("Extra, extra! Read all about it!"),
            )
            .wrap(|| ());
        function();
        assert_eq!(
            sink.contents(),
            "->>>>>>>>         500.0ms      function() - Extra, extra! Read all about it!\n"
        );
    }

    #[test]
    fn test_threshold_condition() {
        let (tracker, sink) = scripted_tracker(&[
            0, 200_000, 0, 500_000, 0, 1_000_000, 0, 2_000_000, 0, 700_000,
        ]);
        let function = tracker
            .timed("function", SectionOptions::new().print_if(|ms| ms > 750.0))
            .wrap(|| ());
        for _ in 0..5 {
            function();
        }
        assert_eq!(
            sink.lines(),
            vec![
                "->>>>>>>>        1000.0ms      function()",
                "->>>>>>>>        2000.0ms      function()",
            ]
        );
    }

    #[test]
    fn test_condition_variants() {
        let cases: Vec<(SectionOptions, bool)> = vec![
            (SectionOptions::new().print_if(|_| true), true),
            (SectionOptions::new().print_if(|_| false), false),
            (SectionOptions::new().print_if(|ms| ms > 100.0), true),
            (SectionOptions::new().print_if(|ms| ms > 1000.0), false),
            (SectionOptions::default(), true),
        ];
        for (options, printed) in cases {
            let (tracker, sink) = scripted_tracker(&[0, 500_000]);
            tracker.timed("function", options).call(|| ());
            let expected = if printed {
                "->>>>>>>>         500.0ms      function()\n"
            } else {
                ""
            };
            assert_eq!(sink.contents(), expected);
        }
    }

    fn run_thunk<R>(f: impl Fn() -> R) -> R {
        f()
    }

    fn run_binary<A, B, R>(f: impl Fn(A, B) -> R, a: A, b: B) -> R {
        f(a, b)
    }

    fn run_mut<R>(mut f: impl FnMut() -> R) -> (R, R) {
        (f(), f())
    }

    #[test]
    fn test_wrapped_callables_keep_their_signature() {
        let (tracker, sink) =
            scripted_tracker(&[0, 1_000, 1_000, 4_000, 4_000, 5_000, 5_000, 7_000]);
        let thunk = tracker.timed("thunk", SectionOptions::default()).wrap(|| 7);
        assert_eq!(run_thunk(thunk), 7);

        let concat = tracker
            .timed("concat", SectionOptions::default())
            .wrap(|a: &str, b: &str| format!("{a}{b}"));
        assert_eq!(run_binary(concat, "sec", "time"), "sectime");

        let mut calls = 0;
        let counter = tracker
            .timed("counter", SectionOptions::default())
            .wrap_mut(|| {
                calls += 1;
                calls
            });
        assert_eq!(run_mut(counter), (1, 2));

        assert_eq!(
            sink.lines(),
            vec![
                "->>>>>>>>           1.0ms      thunk()",
                "->>>>>>>>           3.0ms      concat()",
                "->>>>>>>>           1.0ms      counter()",
                "->>>>>>>>           2.0ms      counter()",
            ]
        );
    }

    #[test]
    fn test_many_arguments() {
        let (tracker, _sink) = scripted_tracker(&[0, 1_000]);
        let sum = tracker
            .timed("sum", SectionOptions::default())
            .wrap(|a: u8, b: u16, c: u32, d: u64, e: i8| {
                i64::from(a) + i64::from(b) + i64::from(c) + d as i64 + i64::from(e)
            });
        assert_eq!(sum(1, 2, 3, 4, -5), 5);
    }

    #[test]
    fn test_label() {
        let (tracker, _sink) = scripted_tracker(&[]);
        assert_eq!(tracker.timed(String::from("load"), SectionOptions::default()).label(), "load()");
    }
}
