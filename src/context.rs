//! # Arena context for parsed structures
//!
//! Schemas and body templates are parsed into arena-allocated structures whose
//! lifetimes are tied to an [ASTContext]. Allocating all nodes of one parse into
//! a single arena keeps allocation cheap and lets the whole structure be dropped
//! at once when it goes out of scope.

/// A context for parsed schema and template structures which holds an arena
/// allocator.
///
/// For the duration of parsing, resolving, and substituting it's performant and
/// convenient to allocate memory in one chunk. This context represents the
/// lifetime of a parsed schema or template tree and its derivatives.
///
/// A schema typically keeps its context alive for the whole process lifetime,
/// while a template tree's context may be dropped right after the substituted
/// request has been built.
pub struct ASTContext {
    /// An arena allocator that holds the memory allocated for this context's lifetime
    pub arena: bumpalo::Bump,
}

impl ASTContext {
    /// Create a new context with a preallocated arena.
    pub fn new() -> Self {
        let arena = bumpalo::Bump::new();
        ASTContext { arena }
    }

    /// Put the value of `item` onto the arena and return a reference to it.
    #[inline]
    pub fn alloc<T>(&self, item: T) -> &T {
        self.arena.alloc(item)
    }

    /// Allocate an `&str` slice onto the arena and return a reference to it.
    ///
    /// This is useful when the original slice has an undefined lifetime.
    /// This is typically unnecessary for static slices (`&'static str`) whose
    /// lifetimes are as long as the running program and don't need to be
    /// allocated dynamically.
    #[inline]
    pub fn alloc_str(&self, str: &str) -> &str {
        self.arena.alloc_str(str)
    }

    /// Puts a `String` onto the arena and returns a reference to it to tie the
    /// `String`'s lifetime to this context without reallocating or copying it.
    #[inline]
    pub fn alloc_string(&self, str: String) -> &str {
        self.arena.alloc(str)
    }
}

impl Default for ASTContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Construct a default value of a type inside a given arena.
///
/// The equivalent of [Default] for structures carrying arena-backed collections,
/// which cannot be constructed without an allocator at hand.
pub trait DefaultIn<'a> {
    fn default_in(arena: &'a bumpalo::Bump) -> Self;
}

impl<'a, T> DefaultIn<'a> for T
where
    T: Default,
{
    fn default_in(_arena: &'a bumpalo::Bump) -> Self {
        Self::default()
    }
}
