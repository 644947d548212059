// Copyright 2020 - developers of the `mtwire` project.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A small expression tree for deciding whether a handler should run for a
//! particular event, built out of comparison leaves combined with `And`,
//! `Or`, and `Not`.
//!
//! Each leaf owns the closure it needs to extract whatever it compares out
//! of the event, so the tree stays homogeneous (`Filter<T>`) regardless of
//! what each leaf actually inspects.

use std::sync::Arc;

type Extractor<T> = Arc<dyn Fn(&T) -> i64 + Send + Sync>;
type Predicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

#[derive(Clone, Copy, Debug)]
enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// An expression that can be evaluated against an event of type `T` to
/// decide whether a handler should run.
pub enum Filter<T> {
    Compare {
        op: Comparison,
        extract: Extractor<T>,
        target: i64,
    },
    In {
        extract: Extractor<T>,
        set: Arc<[i64]>,
    },
    TypeOf(Predicate<T>),
    Custom(Predicate<T>),
    Not(Box<Filter<T>>),
    And(Box<Filter<T>>, Box<Filter<T>>),
    Or(Box<Filter<T>>, Box<Filter<T>>),
}

impl<T> Filter<T> {
    pub fn eq_by<F>(extract: F, target: i64) -> Self
    where
        F: Fn(&T) -> i64 + Send + Sync + 'static,
    {
        Self::Compare { op: Comparison::Eq, extract: Arc::new(extract), target }
    }

    pub fn ne_by<F>(extract: F, target: i64) -> Self
    where
        F: Fn(&T) -> i64 + Send + Sync + 'static,
    {
        Self::Compare { op: Comparison::Ne, extract: Arc::new(extract), target }
    }

    pub fn lt_by<F>(extract: F, target: i64) -> Self
    where
        F: Fn(&T) -> i64 + Send + Sync + 'static,
    {
        Self::Compare { op: Comparison::Lt, extract: Arc::new(extract), target }
    }

    pub fn le_by<F>(extract: F, target: i64) -> Self
    where
        F: Fn(&T) -> i64 + Send + Sync + 'static,
    {
        Self::Compare { op: Comparison::Le, extract: Arc::new(extract), target }
    }

    pub fn gt_by<F>(extract: F, target: i64) -> Self
    where
        F: Fn(&T) -> i64 + Send + Sync + 'static,
    {
        Self::Compare { op: Comparison::Gt, extract: Arc::new(extract), target }
    }

    pub fn ge_by<F>(extract: F, target: i64) -> Self
    where
        F: Fn(&T) -> i64 + Send + Sync + 'static,
    {
        Self::Compare { op: Comparison::Ge, extract: Arc::new(extract), target }
    }

    pub fn in_by<F>(extract: F, set: impl Into<Arc<[i64]>>) -> Self
    where
        F: Fn(&T) -> i64 + Send + Sync + 'static,
    {
        Self::In { extract: Arc::new(extract), set: set.into() }
    }

    /// A filter that inspects the event's shape rather than a value on it,
    /// e.g. matching on which enum variant an update is.
    pub fn type_of<F>(check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::TypeOf(Arc::new(check))
    }

    /// An escape hatch for predicates that don't fit the comparison leaves.
    pub fn custom<F>(check: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(check))
    }

    pub fn and(self, other: Self) -> Self {
        Self::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Self) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    pub fn negate(self) -> Self {
        Self::Not(Box::new(self))
    }

    /// Evaluates the expression against `value`, short-circuiting `And` and
    /// `Or` the same way boolean operators do.
    pub async fn evaluate(&self, value: &T) -> bool {
        match self {
            Self::Compare { op, extract, target } => {
                let got = extract(value);
                match op {
                    Comparison::Eq => got == *target,
                    Comparison::Ne => got != *target,
                    Comparison::Lt => got < *target,
                    Comparison::Le => got <= *target,
                    Comparison::Gt => got > *target,
                    Comparison::Ge => got >= *target,
                }
            }
            Self::In { extract, set } => set.contains(&extract(value)),
            Self::TypeOf(check) | Self::Custom(check) => check(value),
            Self::Not(inner) => !Box::pin(inner.evaluate(value)).await,
            Self::And(left, right) => {
                if !Box::pin(left.evaluate(value)).await {
                    false
                } else {
                    Box::pin(right.evaluate(value)).await
                }
            }
            Self::Or(left, right) => {
                if Box::pin(left.evaluate(value)).await {
                    true
                } else {
                    Box::pin(right.evaluate(value)).await
                }
            }
        }
    }
}

impl<T> std::ops::BitAnd for Filter<T> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl<T> std::ops::BitOr for Filter<T> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

impl<T> std::ops::Not for Filter<T> {
    type Output = Self;

    fn not(self) -> Self {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn eq_matches_extracted_value() {
        let filter = Filter::eq_by(|n: &i32| *n as i64, 42);
        assert!(filter.evaluate(&42).await);
        assert!(!filter.evaluate(&41).await);
    }

    #[tokio::test]
    async fn and_short_circuits_without_evaluating_right() {
        let right_evaluated = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = right_evaluated.clone();
        let filter = Filter::custom(|_: &i32| false).and(Filter::custom(move |_: &i32| {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            true
        }));

        assert!(!filter.evaluate(&0).await);
        assert!(!right_evaluated.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn or_short_circuits_once_left_matches() {
        let right_evaluated = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = right_evaluated.clone();
        let filter = Filter::custom(|_: &i32| true).or(Filter::custom(move |_: &i32| {
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            true
        }));

        assert!(filter.evaluate(&0).await);
        assert!(!right_evaluated.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn not_inverts_the_inner_result() {
        let filter = Filter::custom(|_: &i32| true).negate();
        assert!(!filter.evaluate(&0).await);
    }

    #[tokio::test]
    async fn in_matches_membership() {
        let filter = Filter::in_by(|n: &i32| *n as i64, vec![1, 2, 3]);
        assert!(filter.evaluate(&2).await);
        assert!(!filter.evaluate(&4).await);
    }
}
