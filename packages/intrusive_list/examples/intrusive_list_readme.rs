//! Example from the package README.

use std::rc::Rc;

use intrusive_list::{Links, Node, NodeList};

#[derive(Default)]
struct Particle {
    links: Links<Particle>,
}

impl Node for Particle {
    fn links(&self) -> &Links<Self> {
        &self.links
    }
}

fn main() {
    let mut list = NodeList::new();

    let particle = Rc::new(Particle::default());
    list.push_back(Rc::clone(&particle));

    assert_eq!(list.len(), 1);

    list.remove(&particle);
    assert!(list.is_empty());

    println!("README example completed successfully!");
}
