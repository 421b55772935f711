//! Generic-type reification
//!
//! Provides [`reify`], the pure function that walks a [`TypeDescriptor`]
//! and produces a [`ReifiedType`] shape tree. Generic parameter bounds are
//! resolved recursively with cycle protection, so self-referential bounds
//! (`T: Comparable<T>`, directly or through intermediates) terminate at
//! the unresolved sentinel.

use crate::descriptor::{Bound, TypeDescriptor};
use crate::shape::{RawKind, ReifiedType};
use std::collections::HashSet;

/// Reify a type descriptor into an inspectable shape tree
///
/// - Collections and arrays yield a single argument: the reified element
///   if known, else the unresolved sentinel.
/// - Maps yield exactly two arguments, key then value, each defaulting to
///   the sentinel when unknown.
/// - Plain generic types yield one argument per declared parameter, each
///   resolved from the parameter's declared bound.
///
/// Pure function of its input; the visited set used for cycle detection
/// is scratch state local to one call.
#[must_use]
pub fn reify(descriptor: &TypeDescriptor) -> ReifiedType {
    match descriptor {
        TypeDescriptor::Concrete(kind) => ReifiedType::leaf(kind.clone()),

        TypeDescriptor::Collection { kind, element } => {
            ReifiedType::new(kind.clone(), vec![reify_optional(element.as_deref())])
        }

        TypeDescriptor::Array { element } => ReifiedType::new(
            RawKind::ARRAY,
            vec![reify_optional(element.as_deref())],
        ),

        TypeDescriptor::Map { kind, key, value } => ReifiedType::new(
            kind.clone(),
            vec![
                reify_optional(key.as_deref()),
                reify_optional(value.as_deref()),
            ],
        ),

        TypeDescriptor::Generic { kind, parameters } => {
            let arguments = parameters
                .iter()
                .map(|param| {
                    let mut visited = HashSet::new();
                    resolve_bound(&param.bound, &mut visited)
                })
                .collect();
            ReifiedType::new(kind.clone(), arguments)
        }
    }
}

fn reify_optional(descriptor: Option<&TypeDescriptor>) -> ReifiedType {
    descriptor.map_or_else(ReifiedType::unresolved, reify)
}

/// Resolve the reified shape of one declared bound
///
/// `visited` carries the type-variable names already walked during this
/// top-level resolution; revisiting one means the bound is cyclic and the
/// resolution degrades to the unresolved sentinel.
fn resolve_bound(bound: &Bound, visited: &mut HashSet<String>) -> ReifiedType {
    match bound {
        // A bound of exactly the top type shares the sentinel instead of
        // allocating a fresh leaf.
        Bound::Concrete(kind) if kind.is_object() => ReifiedType::unresolved(),
        Bound::Concrete(kind) => ReifiedType::leaf(kind.clone()),

        // Only the first actual type argument is resolved; the raw type
        // and any further arguments are ignored.
        Bound::Parameterized { arguments, .. } => match arguments.first() {
            Some(first) => resolve_bound(first, visited),
            None => ReifiedType::unresolved(),
        },

        Bound::Wildcard { lower, upper } => {
            if let Some(lower) = lower {
                resolve_bound(lower, visited)
            } else if let Some(first_upper) = upper.first() {
                resolve_bound(first_upper, visited)
            } else {
                ReifiedType::unresolved()
            }
        }

        Bound::Variable { name, bound } => {
            if visited.insert(name.clone()) {
                resolve_bound(bound, visited)
            } else {
                ReifiedType::unresolved()
            }
        }

        Bound::ArrayOf(component) => resolve_bound(component, visited),
    }
}
