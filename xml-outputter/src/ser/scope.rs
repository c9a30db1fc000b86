// Copyright (C) 2021 Scott Lamb <slamb@slamb.org>
// SPDX-License-Identifier: MIT OR Apache-2.0

use log::trace;

use crate::Namespace;

/// The prefix bindings declared by the ancestors of the element being written.
///
/// This is a stack: the serializer records [`NamespaceScope::len`] before an
/// element's start tag, pushes each binding it declares there, and pops back
/// with [`NamespaceScope::pop_to`] once the element is finished. Only the
/// innermost binding of a prefix is visible.
#[derive(Clone, Debug, Default)]
pub struct NamespaceScope<'a> {
    /// `(prefix, uri)`, outermost first.
    bindings: Vec<(&'a str, &'a str)>,
}

impl<'a> NamespaceScope<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, namespace: &'a Namespace) {
        self.bindings.push((namespace.prefix(), namespace.uri()));
    }

    /// Drops bindings until only `mark` remain.
    ///
    /// `mark` should be a value previously returned by [`NamespaceScope::len`].
    pub fn pop_to(&mut self, mark: usize) {
        if self.bindings.len() > mark {
            trace!(
                "dropping {} binding(s) out of scope",
                self.bindings.len() - mark
            );
            self.bindings.truncate(mark);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Returns the uri of the innermost binding of `prefix`, if any.
    pub fn lookup(&self, prefix: &str) -> Option<&'a str> {
        self.bindings
            .iter()
            .rev()
            .find(|(p, _)| *p == prefix)
            .map(|(_, uri)| *uri)
    }

    /// Returns true iff `namespace` would need to be declared here: it's not one
    /// of the sentinels, and its prefix isn't already bound to its uri.
    pub fn needs_declaration(&self, namespace: &Namespace) -> bool {
        namespace.is_declarable() && self.lookup(namespace.prefix()) != Some(namespace.uri())
    }
}
