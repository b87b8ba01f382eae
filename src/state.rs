//! The opaque, per-component persistent state bag collaborator.

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A key-value bag a component carries across cycles.
///
/// The core never reads or writes this beyond handing a reference to the
/// activation callback; it is supplied by the caller at construction time
/// (`ComponentBuilder::with_initial_state`) and otherwise untouched.
pub trait StateBag: Send + Sync {
	fn set(&mut self, key: &str, value: Arc<dyn Any + Send + Sync>);
	fn get(&self, key: &str) -> Option<Arc<dyn Any + Send + Sync>>;
	fn delete(&mut self, key: &str) -> bool;
	fn has(&self, key: &str) -> bool;
	fn clear(&mut self);
}

/// Default [`StateBag`]: a plain in-memory map.
#[derive(Default)]
pub struct MapStateBag {
	entries: BTreeMap<String, Arc<dyn Any + Send + Sync>>,
}

impl MapStateBag {
	pub fn new() -> Self {
		Self::default()
	}
}

impl StateBag for MapStateBag {
	fn set(&mut self, key: &str, value: Arc<dyn Any + Send + Sync>) {
		self.entries.insert(key.to_owned(), value);
	}

	fn get(&self, key: &str) -> Option<Arc<dyn Any + Send + Sync>> {
		self.entries.get(key).cloned()
	}

	fn delete(&mut self, key: &str) -> bool {
		self.entries.remove(key).is_some()
	}

	fn has(&self, key: &str) -> bool {
		self.entries.contains_key(key)
	}

	fn clear(&mut self) {
		self.entries.clear();
	}
}
