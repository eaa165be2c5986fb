//! Integration tests: resolver
use tagsplice::config::{PriorityList, ReadOptions, TagTypeRegistry, WriteOptions};
use tagsplice::resolve::resolve;
use tagsplice::tag::{MetadataTag, TagData, TagFormat, TagSystem, TagSystemView, TagType};

fn tag(format: TagFormat, data: &TagData) -> MetadataTag {
	let bytes = MetadataTag::new(format, data.clone())
		.write(WriteOptions::new())
		.unwrap();
	MetadataTag::read_from(format, &bytes, ReadOptions::new()).unwrap()
}

// One tag per system, every one with its own title. Only some carry an artist or an album.
fn tags() -> Vec<MetadataTag> {
	let mut id3v1 = TagData::new();
	id3v1.set_title("id3v1").set_artist("id3v1 artist");

	let mut id3v2 = TagData::new();
	id3v2.set_title("id3v2").set_album("id3v2 album");

	let mut ape = TagData::new();
	ape.set_title("ape")
		.set_artist("ape artist")
		.set_additional_field("Mood", "calm");

	let mut info = TagData::new();
	info.set_title("native").set_album("native album");

	vec![
		tag(TagFormat::Id3v1, &id3v1),
		tag(TagFormat::Id3v2, &id3v2),
		tag(TagFormat::Ape, &ape),
		tag(TagFormat::RiffInfo, &info),
	]
}

fn views(tags: &[MetadataTag]) -> Vec<&dyn TagSystemView> {
	tags.iter().map(|tag| -> &dyn TagSystemView { tag }).collect()
}

fn permutations(items: &[TagType]) -> Vec<Vec<TagType>> {
	if items.len() <= 1 {
		return vec![items.to_vec()];
	}

	let mut all = Vec::new();
	for (i, first) in items.iter().enumerate() {
		let mut rest = items.to_vec();
		rest.remove(i);

		for mut tail in permutations(&rest) {
			tail.insert(0, *first);
			all.push(tail);
		}
	}

	all
}

fn name(tag_type: TagType) -> &'static str {
	match tag_type {
		TagType::Id3v1 => "id3v1",
		TagType::Id3v2 => "id3v2",
		TagType::Ape => "ape",
		TagType::Native => "native",
		TagType::Any => unreachable!(),
	}
}

#[test_log::test]
fn every_priority_order() {
	let tags = tags();
	let views = views(&tags);

	let orders = permutations(&TagType::KNOWN);
	assert_eq!(orders.len(), 24);

	for order in orders {
		let priority = PriorityList::new([order[0], order[1], order[2], order[3]]).unwrap();

		let first = resolve(&views, &priority, true, TagType::Any);
		let second = resolve(&views, &priority, true, TagType::Any);

		assert!(first.is_merged());
		assert_eq!(first.title(), second.title());
		assert_eq!(first.title().as_deref(), Some(name(order[0])));

		let expected_artist = order
			.iter()
			.find(|t| matches!(t, TagType::Id3v1 | TagType::Ape))
			.map(|t| format!("{} artist", name(*t)));
		assert_eq!(first.artist().map(|a| a.into_owned()), expected_artist);

		let expected_album = order
			.iter()
			.find(|t| matches!(t, TagType::Id3v2 | TagType::Native))
			.map(|t| format!("{} album", name(*t)));
		assert_eq!(first.album().map(|a| a.into_owned()), expected_album);

		// Only APE has additional fields, so it wins regardless of its rank
		assert_eq!(first.additional_fields()["Mood"], "calm");
	}
}

#[test_log::test]
fn cross_reading_toggle() {
	let tags = tags();
	let views = views(&tags);

	let registry = TagTypeRegistry::new();
	registry.set_priority(TagType::Native, 0);

	let merged = registry.resolve(&views, TagType::Any);
	assert!(merged.is_merged());
	assert_eq!(merged.title().as_deref(), Some("native"));
	// Native has no artist, the next system that does fills it in
	assert!(merged.artist().is_some());

	registry.set_cross_reading(false);

	let single = registry.resolve(&views, TagType::Any);
	assert!(!single.is_merged());
	assert_eq!(single.tag_type(), TagType::Native);
	assert_eq!(single.title().as_deref(), Some("native"));
	assert!(single.artist().is_none());

	registry.reset();
	assert!(registry.cross_reading());
	assert_eq!(registry.priority(), PriorityList::DEFAULT);
}

#[test_log::test]
fn forced_tag_type() {
	let tags = tags();
	let views = views(&tags);

	let registry = TagTypeRegistry::new();

	let ape = registry.resolve(&views, TagType::Ape);
	assert!(!ape.is_merged());
	assert_eq!(ape.title().as_deref(), Some("ape"));
	assert!(ape.album().is_none());

	// A forced type that isn't there doesn't fall back to anything
	let only_ape = &views[2..3];
	let absent = registry.resolve(only_ape, TagType::Id3v2);
	assert!(!absent.exists());
	assert!(absent.title().is_none());
}

#[test_log::test]
fn single_system_is_never_merged() {
	let tags = tags();
	let views: [&dyn TagSystemView; 1] = [&tags[0]];

	let resolved = resolve(&views, &PriorityList::DEFAULT, true, TagType::Any);
	assert!(!resolved.is_merged());
	assert_eq!(resolved.title().as_deref(), Some("id3v1"));

	let nothing = resolve(&[], &PriorityList::DEFAULT, true, TagType::Any);
	assert!(!nothing.exists());
}

#[test_log::test]
fn set_priority_swaps() {
	let mut list = PriorityList::DEFAULT;
	list.set_priority(TagType::Id3v1, 0);
	assert_eq!(
		list.as_slice(),
		&[TagType::Id3v1, TagType::Ape, TagType::Native, TagType::Id3v2]
	);

	// Out of range ranks and the wildcard are ignored
	list.set_priority(TagType::Ape, TagType::COUNT);
	list.set_priority(TagType::Any, 0);
	assert_eq!(
		list.as_slice(),
		&[TagType::Id3v1, TagType::Ape, TagType::Native, TagType::Id3v2]
	);
}
