//! Demonstrates the basic operations of `NodeList`.
//!
//! Shows membership edits, iteration and splicing, all operating on the link state
//! embedded in the member objects themselves.

use std::cell::Cell;
use std::rc::Rc;

use intrusive_list::{Links, Node, NodeList};

/// A member type: embeds its link state and returns it from the `Node` trait.
#[derive(Default)]
struct Particle {
    links: Links<Particle>,
    energy: Cell<u32>,
}

impl Node for Particle {
    fn links(&self) -> &Links<Self> {
        &self.links
    }
}

fn particle(energy: u32) -> Rc<Particle> {
    let particle = Rc::new(Particle::default());
    particle.energy.set(energy);
    particle
}

fn demonstrate_membership_edits() {
    println!("Example 1: O(1) membership edits");
    println!("--------------------------------");

    let mut list = NodeList::new();

    let a = particle(10);
    let b = particle(20);
    let c = particle(30);

    list.push_back(Rc::clone(&a));
    list.push_back(Rc::clone(&b));
    list.push_back(Rc::clone(&c));

    println!("After adding three particles: len = {}", list.len());

    // Removal needs no traversal - the object knows its own neighbors.
    list.remove(&b);
    println!("After removing the middle one: len = {}", list.len());

    let first = list.remove_first();
    println!(
        "Removed from the front: energy = {}",
        first.energy.get()
    );

    println!();
}

fn demonstrate_iteration() {
    println!("Example 2: Allocation-free iteration");
    println!("------------------------------------");

    let mut list = NodeList::new();

    for energy in [1_u32, 2, 3, 4, 5] {
        list.push_back(particle(energy));
    }

    let total: u32 = list.iter().map(|member| member.energy.get()).sum();
    println!("Sum over {} members: {total}", list.len());

    // Iteration is restartable - just ask for a fresh iterator.
    let count = list.iter().count();
    println!("Second pass visited {count} members");

    println!();
}

fn demonstrate_splicing() {
    println!("Example 3: Splicing one list onto another");
    println!("-----------------------------------------");

    let mut active = NodeList::new();
    let mut incoming = NodeList::new();

    active.push_back(particle(1));
    incoming.push_back(particle(2));
    incoming.push_back(particle(3));

    println!(
        "Before: active = {}, incoming = {}",
        active.len(),
        incoming.len()
    );

    active.append(&mut incoming);

    println!(
        "After:  active = {}, incoming = {}",
        active.len(),
        incoming.len()
    );

    println!();
}

fn main() {
    println!("=== NodeList Examples ===");
    println!();

    demonstrate_membership_edits();
    demonstrate_iteration();
    demonstrate_splicing();

    println!("NodeList example completed successfully!");
}
