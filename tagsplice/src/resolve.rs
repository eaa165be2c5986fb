//! Combining the tag systems of a file into one view
//!
//! A file may carry several tag systems at once (Ex. ID3v1 + APE in WavPack). When reading,
//! the [`TagTypeRegistry`](crate::config::TagTypeRegistry) decides whether only the highest
//! priority tag is used, or whether all of them are merged.
//!
//! Merging follows a simple rule: for every field, the first tag (in priority order) with a
//! non-empty value wins. Collections (additional fields, pictures, chapters, lyrics) are never
//! combined, the first non-empty collection wins as a whole.

use crate::config::PriorityList;
use crate::picture::Picture;
use crate::tag::items::{Chapter, Lyrics};
use crate::tag::{EmptyView, FieldKey, NO_ADDITIONAL_FIELDS, TagSystemView, TagType};

use std::borrow::Cow;
use std::collections::BTreeMap;

/// The result of [`resolve`]
///
/// Borrows the views it was created from.
#[derive(Clone)]
pub enum ResolvedView<'a> {
	/// Exactly one tag system
	Single(&'a dyn TagSystemView),
	/// Several tag systems, merged by priority
	Merged(MergedView<'a>),
	/// No tag system matched
	Empty(EmptyView),
}

impl ResolvedView<'_> {
	fn inner(&self) -> &dyn TagSystemView {
		match self {
			Self::Single(view) => *view,
			Self::Merged(merged) => merged,
			Self::Empty(empty) => empty,
		}
	}

	/// Whether this view merges multiple tag systems
	pub fn is_merged(&self) -> bool {
		matches!(self, Self::Merged(_))
	}
}

impl std::fmt::Debug for ResolvedView<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Single(view) => f.debug_tuple("Single").field(&view.tag_type()).finish(),
			Self::Merged(merged) => f.debug_tuple("Merged").field(&merged.order()).finish(),
			Self::Empty(_) => f.write_str("Empty"),
		}
	}
}

/// Several tag systems, consulted in priority order
#[derive(Clone)]
pub struct MergedView<'a> {
	// Existing views only, highest priority first
	sources: Vec<&'a dyn TagSystemView>,
}

impl MergedView<'_> {
	/// The tag types being merged, highest priority first
	pub fn order(&self) -> Vec<TagType> {
		self.sources.iter().map(|view| view.tag_type()).collect()
	}

	fn first_non_empty<'s, T, F>(&'s self, get: F) -> Option<T>
	where
		F: Fn(&'s dyn TagSystemView) -> Option<T>,
	{
		self.sources.iter().find_map(|view| get(*view))
	}
}

impl TagSystemView for MergedView<'_> {
	fn tag_type(&self) -> TagType {
		TagType::Any
	}

	fn exists(&self) -> bool {
		!self.sources.is_empty()
	}

	fn field(&self, key: FieldKey) -> Option<Cow<'_, str>> {
		self.first_non_empty(|view| view.field(key))
	}

	fn additional_fields(&self) -> &BTreeMap<String, String> {
		self.first_non_empty(|view| {
			let fields = view.additional_fields();
			(!fields.is_empty()).then_some(fields)
		})
		.unwrap_or(&NO_ADDITIONAL_FIELDS)
	}

	fn pictures(&self) -> &[Picture] {
		self.first_non_empty(|view| {
			let pictures = view.pictures();
			(!pictures.is_empty()).then_some(pictures)
		})
		.unwrap_or_default()
	}

	fn chapters(&self) -> &[Chapter] {
		self.first_non_empty(|view| {
			let chapters = view.chapters();
			(!chapters.is_empty()).then_some(chapters)
		})
		.unwrap_or_default()
	}

	fn chapters_table_description(&self) -> Option<&str> {
		self.first_non_empty(|view| {
			view.chapters_table_description()
				.filter(|description| !description.trim().is_empty())
		})
	}

	fn lyrics(&self) -> Option<&Lyrics> {
		self.first_non_empty(|view| view.lyrics().filter(|lyrics| !lyrics.is_empty()))
	}

	fn size(&self) -> u64 {
		self.sources.iter().map(|view| view.size()).sum()
	}

	fn padding_size(&self) -> u64 {
		self.sources.iter().map(|view| view.padding_size()).sum()
	}
}

impl TagSystemView for ResolvedView<'_> {
	fn tag_type(&self) -> TagType {
		self.inner().tag_type()
	}

	fn exists(&self) -> bool {
		self.inner().exists()
	}

	fn field(&self, key: FieldKey) -> Option<Cow<'_, str>> {
		self.inner().field(key)
	}

	fn additional_fields(&self) -> &BTreeMap<String, String> {
		self.inner().additional_fields()
	}

	fn pictures(&self) -> &[Picture] {
		self.inner().pictures()
	}

	fn chapters(&self) -> &[Chapter] {
		self.inner().chapters()
	}

	fn chapters_table_description(&self) -> Option<&str> {
		self.inner().chapters_table_description()
	}

	fn lyrics(&self) -> Option<&Lyrics> {
		self.inner().lyrics()
	}

	fn size(&self) -> u64 {
		self.inner().size()
	}

	fn padding_size(&self) -> u64 {
		self.inner().padding_size()
	}
}

/// Compose `views` into one view
///
/// * `forced` other than [`TagType::Any`] selects that tag system alone, or an empty view if it
///   doesn't exist in `views`.
/// * With `cross_reading` disabled, or fewer than two existing tag systems, the highest priority
///   existing view is used.
/// * Otherwise, every existing view is merged in `priority` order.
///
/// Views that don't [exist](TagSystemView::exists) are ignored.
///
/// # Examples
///
/// ```rust
/// use tagsplice::config::PriorityList;
/// use tagsplice::resolve::resolve;
/// use tagsplice::config::{ReadOptions, WriteOptions};
/// use tagsplice::tag::{MetadataTag, TagData, TagFormat, TagSystem, TagSystemView, TagType};
///
/// # fn main() -> tagsplice::error::Result<()> {
/// let mut data = TagData::new();
/// data.set_title("From APE");
///
/// let ape_bytes = MetadataTag::new(TagFormat::Ape, data).write(WriteOptions::default())?;
/// let ape = MetadataTag::read_from(TagFormat::Ape, &ape_bytes, ReadOptions::new())?;
///
/// let resolved = resolve(&[&ape], &PriorityList::DEFAULT, true, TagType::Any);
/// assert_eq!(resolved.title().as_deref(), Some("From APE"));
///
/// let forced = resolve(&[&ape], &PriorityList::DEFAULT, true, TagType::Id3v2);
/// assert!(!forced.exists());
/// # Ok(()) }
/// ```
pub fn resolve<'a>(
	views: &[&'a dyn TagSystemView],
	priority: &PriorityList,
	cross_reading: bool,
	forced: TagType,
) -> ResolvedView<'a> {
	if !forced.is_wildcard() {
		return match views
			.iter()
			.find(|view| view.exists() && view.tag_type() == forced)
		{
			Some(view) => ResolvedView::Single(*view),
			None => {
				log::debug!("Requested {forced:?}, which doesn't exist");
				ResolvedView::Empty(EmptyView)
			},
		};
	}

	let sources = priority
		.iter()
		.filter_map(|tag_type| {
			views
				.iter()
				.find(|view| view.exists() && view.tag_type() == tag_type)
				.copied()
		})
		.collect::<Vec<_>>();

	if sources.len() < 2 || !cross_reading {
		return sources
			.first()
			.map_or(ResolvedView::Empty(EmptyView), |view| ResolvedView::Single(*view));
	}

	log::trace!("Merging {} tag systems", sources.len());
	ResolvedView::Merged(MergedView { sources })
}
