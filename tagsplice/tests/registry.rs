//! Integration tests: registry
use tagsplice::config::{PriorityList, TagTypeRegistry};
use tagsplice::tag::TagType;

use std::sync::{Arc, Barrier};
use std::thread;

use rusty_fork::rusty_fork_test;

// Every test gets a fresh process, so the global registry starts out uninitialized
rusty_fork_test! {
	#[test_log::test]
	fn global_is_initialized_once() {
		const THREADS: usize = 16;

		let barrier = Arc::new(Barrier::new(THREADS));
		let handles = (0..THREADS)
			.map(|_| {
				let barrier = Arc::clone(&barrier);
				thread::spawn(move || {
					barrier.wait();
					std::ptr::from_ref(TagTypeRegistry::global()) as usize
				})
			})
			.collect::<Vec<_>>();

		let addresses = handles
			.into_iter()
			.map(|handle| handle.join().unwrap())
			.collect::<Vec<_>>();

		assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
		assert_eq!(TagTypeRegistry::global().priority(), PriorityList::DEFAULT);
		assert!(TagTypeRegistry::global().cross_reading());
	}

	#[test_log::test]
	fn global_changes_are_visible_everywhere() {
		TagTypeRegistry::global().set_priority(TagType::Ape, 0);
		TagTypeRegistry::global().set_cross_reading(false);

		let (priority, cross_reading) = thread::spawn(|| {
			let registry = TagTypeRegistry::global();
			(registry.priority(), registry.cross_reading())
		})
		.join()
		.unwrap();

		assert_eq!(priority.rank_of(TagType::Ape), Some(0));
		assert_eq!(priority.rank_of(TagType::Id3v2), Some(1));
		assert!(!cross_reading);

		TagTypeRegistry::global().reset();
		assert_eq!(TagTypeRegistry::global().priority(), PriorityList::DEFAULT);
	}

	#[test_log::test]
	fn local_registries_are_independent() {
		let local = TagTypeRegistry::new();
		local.set_priority(TagType::Id3v1, 0);

		assert_eq!(local.priority().rank_of(TagType::Id3v1), Some(0));
		assert_eq!(TagTypeRegistry::global().priority(), PriorityList::DEFAULT);
	}
}
