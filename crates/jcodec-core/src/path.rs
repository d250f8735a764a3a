//! `Path` accumulates the location being decoded, starting at `"$"`. Object
//! descent appends `.field`; array descent appends `[i]`.
//!
//! Represented as an owned, small `Vec` of segments rather than a borrowed
//! cons-list: decoders frequently build a sibling path from a shared parent
//! (e.g. each array element pushes its own index onto the same parent path),
//! which a borrowed, arena-style chain -- every frame pinned to a stable
//! stack address for the duration of a single recursive walk -- cannot
//! express without unsafe or an explicit arena. JSON documents are shallow
//! in practice, so the clone-per-push this costs is negligible next to the
//! allocation a failing decode already pays to render an error.
use std::fmt;

#[derive(Clone, Debug)]
enum Segment {
    Field(String),
    Index(usize),
}

/// A location within a JSON document currently being decoded.
#[derive(Clone, Debug, Default)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Path {
        Path(Vec::new())
    }

    pub fn push_field(&self, name: &str) -> Path {
        let mut segments = self.0.clone();
        segments.push(Segment::Field(name.to_string()));
        Path(segments)
    }

    pub fn push_index(&self, index: usize) -> Path {
        let mut segments = self.0.clone();
        segments.push(Segment::Index(index));
        Path(segments)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for segment in &self.0 {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_root() {
        assert_eq!(Path::root().to_string(), "$");
    }

    #[test]
    fn test_field_and_index() {
        let root = Path::root();
        let a = root.push_field("a");
        let b = a.push_field("b");
        let item = b.push_index(2);
        assert_eq!(item.to_string(), "$.a.b[2]");
        // Siblings built from a shared parent don't interfere with each other.
        let sibling = b.push_index(9);
        assert_eq!(sibling.to_string(), "$.a.b[9]");
        assert_eq!(item.to_string(), "$.a.b[2]");
    }
}
