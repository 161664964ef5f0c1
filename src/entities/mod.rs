// Entity Models
//
// Trees are values: a name plus an absorption rate, shared through Arc so the
// catalog and the garden can point at the same instance.

pub mod tree;

pub use tree::Tree;
