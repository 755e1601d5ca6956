// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dependency resolution.
//!
//! The resolved order is a topological sort of the value graph: an edge
//! A -> B exists when A holds B by value (struct member or collection
//! element that is not a pointer) or when A was given B as an explicit
//! declaration dependency. Pointer edges never enter this graph, so
//! back-references through pointers cannot form a cycle.
//!
//! Ties are broken by registration order, which makes the output a pure
//! function of the registry contents; generated file diffs depend on it.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::error::ConfigError;
use crate::registry::{Closure, Registry};
use crate::types::{TypeDescription, TypeId};

/// Types that must be declared before `ty`, in insertion order, no duplicates.
fn value_edges(registry: &Registry, ty: &TypeDescription) -> Vec<TypeId> {
    let mut edges = Vec::new();
    if !ty.is_pointer() {
        for id in ty.member_types() {
            if !registry.by_id(id).is_pointer() && !edges.contains(&id) {
                edges.push(id);
            }
        }
    }
    for &id in ty.explicit_decl_dependencies() {
        if !edges.contains(&id) {
            edges.push(id);
        }
    }
    edges
}

/// Kahn's algorithm with a registration-ordered ready set.
pub(crate) fn resolve_order(registry: &Registry) -> Result<Vec<TypeId>, ConfigError> {
    let types = registry.types();
    let mut pending: Vec<usize> = vec![0; types.len()];
    let mut dependents: Vec<Vec<TypeId>> = vec![Vec::new(); types.len()];

    for ty in types {
        for dep in value_edges(registry, ty) {
            pending[ty.id().index()] += 1;
            dependents[dep.index()].push(ty.id());
        }
    }

    let mut ready: BTreeSet<TypeId> = types
        .iter()
        .map(TypeDescription::id)
        .filter(|id| pending[id.index()] == 0)
        .collect();
    let mut order = Vec::with_capacity(types.len());

    while let Some(id) = ready.pop_first() {
        order.push(id);
        for &dependent in &dependents[id.index()] {
            pending[dependent.index()] -= 1;
            if pending[dependent.index()] == 0 {
                ready.insert(dependent);
            }
        }
    }

    if order.len() < types.len() {
        let stuck: Vec<TypeId> = types
            .iter()
            .map(TypeDescription::id)
            .filter(|id| pending[id.index()] > 0)
            .collect();
        return Err(ConfigError::CyclicDependency {
            cycle: find_cycle(registry, &stuck),
        });
    }

    Ok(order)
}

/// Walk value edges from the first stuck type until a type repeats.
fn find_cycle(registry: &Registry, stuck: &[TypeId]) -> Vec<String> {
    let stuck_set: HashSet<TypeId> = stuck.iter().copied().collect();
    let mut stack: Vec<TypeId> = Vec::new();
    let mut current = stuck[0];

    loop {
        if let Some(pos) = stack.iter().position(|id| *id == current) {
            let mut cycle: Vec<String> = stack[pos..]
                .iter()
                .map(|id| registry.by_id(*id).type_name().to_string())
                .collect();
            cycle.push(registry.by_id(current).type_name().to_string());
            return cycle;
        }
        stack.push(current);
        // Every stuck type still waits on at least one stuck dependency.
        current = value_edges(registry, registry.by_id(current))
            .into_iter()
            .find(|id| stuck_set.contains(id))
            .unwrap_or(current);
    }
}

/// Order `ids` by resolved rank, dropping duplicates.
pub fn sort_types(registry: &Registry, ids: impl IntoIterator<Item = TypeId>) -> Vec<TypeId> {
    let mut unique: Vec<TypeId> = Vec::new();
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique.sort_by_key(|id| registry.rank(*id));
    unique
}

/// Depth-first closure over member types, seen through `non_pointer_type`.
///
/// Visited types are memoized, so structural cycles through pointers end
/// the walk instead of recursing forever. The root is never part of the
/// result.
pub fn all_types(registry: &Registry, root: TypeId) -> Vec<TypeId> {
    let mut visited: HashSet<TypeId> = HashSet::from([root]);
    let mut found: Vec<TypeId> = Vec::new();
    let mut stack: Vec<TypeId> = registry.by_id(root).member_types();
    stack.reverse();

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let ty = registry.by_id(id);
        let target = ty.non_pointer_type();
        if target != root && !found.contains(&target) {
            found.push(target);
        }
        let mut next = ty.member_types();
        next.reverse();
        stack.extend(next);
    }

    sort_types(registry, found)
}

pub(crate) fn closure(registry: &Registry, id: TypeId) -> Closure {
    let ty = registry.by_id(id);
    let all = all_types(registry, id);
    let decl = sort_types(
        registry,
        all.iter()
            .copied()
            .chain(ty.explicit_decl_dependencies().iter().copied()),
    );
    let defn = sort_types(registry, ty.explicit_defn_dependencies().iter().copied());
    Closure {
        all_types: all,
        decl,
        defn,
    }
}

/// Member paths at which each type occurs by value inside `root`.
///
/// The root itself is recorded with the empty path. Pointer members are
/// listed under the pointer type but not entered.
pub fn recursive_members(registry: &Registry, root: TypeId) -> BTreeMap<String, Vec<Vec<String>>> {
    let mut acc: BTreeMap<String, Vec<Vec<String>>> = BTreeMap::new();
    accumulate_members(registry, root, &mut Vec::new(), &mut acc);
    acc
}

fn accumulate_members(
    registry: &Registry,
    id: TypeId,
    context: &mut Vec<String>,
    acc: &mut BTreeMap<String, Vec<Vec<String>>>,
) {
    let ty = registry.by_id(id);
    acc.entry(ty.type_name().to_string())
        .or_default()
        .push(context.clone());
    if ty.is_pointer() {
        return;
    }
    for member in ty.members() {
        context.push(member.name.clone());
        accumulate_members(registry, member.type_id, context, acc);
        context.pop();
    }
}
