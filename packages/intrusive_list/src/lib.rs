//! A doubly-linked list whose links live inside the member objects themselves.
//!
//! This crate provides [`NodeList`], an intrusive list manager for performance-sensitive
//! code that must avoid heap churn in hot loops. The list owns no member storage: each
//! member type embeds a [`Links`] field and the list merely rearranges those embedded
//! links, so every membership edit is O(1) and steady-state operation allocates nothing.
//!
//! # Key Features
//!
//! - **Intrusive storage**: Link fields live inside members, not in wrapper nodes
//! - **O(1) surgery**: [`push_back()`][NodeList::push_back], [`remove()`][NodeList::remove],
//!   [`remove_first()`][NodeList::remove_first] and [`remove_last()`][NodeList::remove_last]
//!   touch only the affected links
//! - **Allocation-free iteration**: [`iter()`][NodeList::iter] walks the chain without
//!   creating wrapper storage, and the borrow it holds makes mid-iteration mutation a
//!   compile error
//! - **Splicing**: [`append()`][NodeList::append] moves an entire list onto another's tail
//! - **Misuse is caught at the call site**: adding an already-listed object, removing a
//!   non-member and taking from an empty list all panic immediately
//!
//! Members circulate as [`Rc`][std::rc::Rc] handles, which makes the types in this crate
//! single-threaded (`!Send`, `!Sync`). Wrap the whole structure in a lock if you must move
//! it across threads; the list itself takes no position on synchronization.
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use intrusive_list::{Links, Node, NodeList};
//!
//! #[derive(Default)]
//! struct Particle {
//!     links: Links<Particle>,
//!     energy: Cell<u32>,
//! }
//!
//! impl Node for Particle {
//!     fn links(&self) -> &Links<Self> {
//!         &self.links
//!     }
//! }
//!
//! let mut active = NodeList::new();
//!
//! let particle = Rc::new(Particle::default());
//! particle.energy.set(100);
//!
//! // The list stores one handle; we keep another.
//! active.push_back(Rc::clone(&particle));
//!
//! for member in &active {
//!     member.energy.set(member.energy.get() - 1);
//! }
//!
//! active.remove(&particle);
//! assert!(active.is_empty());
//! assert_eq!(particle.energy.get(), 99);
//! ```

mod list;
mod node;

pub use list::*;
pub use node::*;
