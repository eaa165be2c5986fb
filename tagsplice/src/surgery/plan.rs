use super::patch::{IndexPatch, SizePatch};
use super::zone::{Zone, ZoneRegistry};
use crate::error::Result;

/// Everything a parser learned about a file's replaceable regions
///
/// A plan is built while parsing, consumed by one write, and then discarded. Writers always
/// re-parse the file to get a fresh plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSurgeryPlan {
	pub(crate) zones: ZoneRegistry,
	pub(crate) size_patches: Vec<SizePatch>,
	pub(crate) index_patches: Vec<IndexPatch>,
}

impl FileSurgeryPlan {
	/// Create an empty plan
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a zone, see [`ZoneRegistry::add_zone`]
	///
	/// # Errors
	///
	/// See [`ZoneRegistry::add`]
	pub fn add_zone(&mut self, offset: u64, size: u64, name: impl Into<String>) -> Result<()> {
		self.zones.add_zone(offset, size, name)
	}

	/// Register a fully configured zone, see [`ZoneRegistry::add`]
	///
	/// # Errors
	///
	/// See [`ZoneRegistry::add`]
	pub fn add(&mut self, zone: Zone) -> Result<()> {
		self.zones.add(zone)
	}

	/// Register a length field that depends on a zone
	///
	/// Patches are only validated once the plan is executed, so they may refer to zones
	/// registered later.
	pub fn add_size(&mut self, patch: SizePatch) {
		log::trace!(
			"Registering size patch @ {} for zone \"{}\"",
			patch.target_offset,
			patch.zone
		);
		self.size_patches.push(patch);
	}

	/// Register an absolute offset field
	pub fn add_index(&mut self, patch: IndexPatch) {
		log::trace!("Registering index patch @ {}", patch.target_offset);
		self.index_patches.push(patch);
	}

	/// Get a zone by name
	pub fn zone(&self, name: &str) -> Option<&Zone> {
		self.zones.zone(name)
	}

	/// The registered zones
	pub fn zones(&self) -> &ZoneRegistry {
		&self.zones
	}

	/// The registered size patches
	pub fn size_patches(&self) -> &[SizePatch] {
		&self.size_patches
	}

	/// The registered index patches
	pub fn index_patches(&self) -> &[IndexPatch] {
		&self.index_patches
	}

	/// Drop all zones and patches
	pub fn clear(&mut self) {
		self.zones.clear();
		self.size_patches.clear();
		self.index_patches.clear();
	}

	/// Whether nothing has been registered
	pub fn is_empty(&self) -> bool {
		self.zones.is_empty() && self.size_patches.is_empty() && self.index_patches.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::FileSurgeryPlan;
	use crate::surgery::{IndexPatch, PatchWidth, SizePatch};

	#[test_log::test]
	fn clear_drops_everything() {
		let mut plan = FileSurgeryPlan::new();
		plan.add_zone(0, 10, "id3v2").unwrap();
		plan.add_size(SizePatch::new(12, PatchWidth::U64, "id3v2"));
		plan.add_index(IndexPatch::new(20, PatchWidth::U64));

		assert!(!plan.is_empty());
		assert_eq!(plan.size_patches().len(), 1);
		assert_eq!(plan.index_patches().len(), 1);

		plan.clear();
		assert!(plan.is_empty());
		assert!(plan.zone("id3v2").is_none());
	}
}
