pub mod chain;
pub mod input;
pub mod polymer;
pub mod template;

// re-export for cleaner imports
pub use self::chain::{Chain, DnaChain, Ligand, ProteinChain, RnaChain};
pub use self::input::FoldInput;
pub use self::polymer::PolymerType;
pub use self::template::Template;
