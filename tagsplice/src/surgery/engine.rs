use super::patch::{Endianness, PatchWidth, SizeMode, SizePatch};
use super::plan::FileSurgeryPlan;
use super::zone::Zone;
use crate::error::{Result, SpliceError, ZoneError};
use crate::macros::{err, surgery_err};
use crate::util::io::{FileLike, Length, SeekStreamLen, Truncate, copy_exact, overwrite};

use std::collections::HashMap;
use std::io::{Read, Seek, SeekFrom, Write};

/// New contents for the zones of a [`FileSurgeryPlan`], keyed by zone name
///
/// A zone without an entry keeps its original bytes, a zone mapped to an empty `Vec` is deleted.
pub type ZoneContents = HashMap<String, Vec<u8>>;

/// The result of a successful rewrite
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SurgeryOutcome {
	/// The length of the original stream
	pub original_len: u64,
	/// The length of the rewritten stream
	pub new_len: u64,
}

impl SurgeryOutcome {
	/// How much the stream grew (or shrank)
	pub fn delta(&self) -> i64 {
		self.new_len as i64 - self.original_len as i64
	}
}

struct ZoneEdit<'a> {
	zone: &'a Zone,
	content: Option<&'a [u8]>,
}

impl ZoneEdit<'_> {
	fn new_size(&self) -> u64 {
		self.content
			.map_or(self.zone.original_size, |content| content.len() as u64)
	}

	fn delta(&self) -> i128 {
		i128::from(self.new_size()) - i128::from(self.zone.original_size)
	}
}

struct PatchWrite {
	offset: u64,
	bytes: Vec<u8>,
}

/// Rewrite `original` into `output`, replacing zones with `contents` and fixing up every
/// registered size and index field
///
/// Gaps between zones are copied verbatim, with patched fields overlaid. The output only
/// needs to be [`Write`], nothing is ever read back from it.
///
/// # Errors
///
/// * A zone or patch lies beyond the end of `original` (`TruncatedFile`)
/// * `contents` names a zone that isn't registered (`InvalidZone`)
/// * A patch sits inside a zone, overlaps another patch, refers to an unknown zone,
///   or its new value doesn't fit (`InvalidPatch`)
/// * The number of emitted bytes disagrees with the predicted length (`SizeMismatch`)
/// * `std::io::Error`
pub fn rewrite<R, W>(
	original: &mut R,
	plan: &FileSurgeryPlan,
	contents: &ZoneContents,
	output: &mut W,
) -> Result<SurgeryOutcome>
where
	R: Read + Seek,
	W: Write,
{
	let stream_len = original.stream_len_hack()?;

	for name in contents.keys() {
		if plan.zone(name).is_none() {
			surgery_err!(@ZONE name.as_str(), "no zone registered with this name");
		}
	}

	let mut edits = Vec::with_capacity(plan.zones.len());
	for zone in plan.zones.sorted() {
		if zone.end() > stream_len {
			return Err(SpliceError::truncated(zone.end(), stream_len));
		}

		let mut content = contents.get(zone.name()).map(Vec::as_slice);
		if content.is_some_and(<[u8]>::is_empty)
			&& zone.is_required_when_empty()
			&& !zone.is_insertion_point()
		{
			log::warn!(
				"Zone \"{}\" can't be emptied, keeping its original content",
				zone.name()
			);
			content = None;
		}

		edits.push(ZoneEdit { zone, content });
	}

	let patches = compute_patches(original, plan, &edits, stream_len)?;

	let total_delta = edits.iter().map(ZoneEdit::delta).sum::<i128>();
	let expected_len = i128::from(stream_len) + total_delta;

	let mut writer = CountingWriter {
		inner: output,
		written: 0,
	};

	let mut pos = 0;
	for edit in &edits {
		copy_gap(original, &mut writer, pos, edit.zone.offset, &patches)?;

		match edit.content {
			Some(content) => {
				log::trace!(
					"Zone \"{}\": {} -> {} bytes",
					edit.zone.name(),
					edit.zone.original_size,
					content.len()
				);
				writer.write_all(content)?
			},
			None => {
				original.seek(SeekFrom::Start(edit.zone.offset))?;
				copy_exact(original, &mut writer, edit.zone.original_size)?;
			},
		}

		pos = edit.zone.end();
	}

	copy_gap(original, &mut writer, pos, stream_len, &patches)?;

	if i128::from(writer.written) != expected_len {
		log::error!(
			"Rewrite emitted {} bytes, expected {}",
			writer.written,
			expected_len
		);
		err!(SizeMismatch);
	}

	Ok(SurgeryOutcome {
		original_len: stream_len,
		new_len: writer.written,
	})
}

/// Rewrite `file` in place
///
/// The new content is generated in memory first, `file` is only touched once the
/// rewrite fully succeeded.
///
/// # Errors
///
/// See [`rewrite`]
pub fn splice_file<F>(
	file: &mut F,
	plan: &FileSurgeryPlan,
	contents: &ZoneContents,
) -> Result<SurgeryOutcome>
where
	F: FileLike,
	SpliceError: From<<F as Truncate>::Error>,
	SpliceError: From<<F as Length>::Error>,
{
	file.rewind()?;

	let mut new_content = Vec::new();
	let outcome = rewrite(file, plan, contents, &mut new_content)?;

	overwrite(file, &new_content)?;

	log::debug!(
		"Spliced {} zone(s), file size: {} -> {}",
		contents.len(),
		outcome.original_len,
		outcome.new_len
	);

	Ok(outcome)
}

fn compute_patches<R>(
	original: &mut R,
	plan: &FileSurgeryPlan,
	edits: &[ZoneEdit<'_>],
	stream_len: u64,
) -> Result<Vec<PatchWrite>>
where
	R: Read + Seek,
{
	let mut writes = Vec::new();

	for patch in &plan.index_patches {
		let target = patch.target_offset;
		validate_location(target, patch.width, edits, stream_len)?;

		let linked = match &patch.zone {
			Some(name) => Some(find_edit(edits, name, "index patch refers to an unknown zone")?),
			None => None,
		};

		let value = if linked.is_some_and(|edit| edit.new_size() == 0) {
			0
		} else {
			let original_value = match patch.value {
				Some(value) => value,
				None => read_original(original, target, patch.width, patch.endianness)?,
			};

			let shift = edits
				.iter()
				.filter(|edit| edit.zone.offset < target)
				.map(ZoneEdit::delta)
				.sum::<i128>();

			checked_value(i128::from(original_value) + shift, patch.width, target)?
		};

		log::trace!("Index patch @ {target}: new value {value}");
		writes.push(PatchWrite {
			offset: target,
			bytes: patch.width.encode(value, patch.endianness),
		});
	}

	for (target, group) in group_size_patches(&plan.size_patches) {
		let first = group[0];

		if group
			.iter()
			.any(|p| p.width != first.width || p.endianness != first.endianness)
		{
			surgery_err!(@PATCH target, "size patches disagree on the field's layout");
		}

		if group.len() > 1 && group.iter().any(|p| p.mode == SizeMode::Absolute) {
			surgery_err!(@PATCH target, "an absolute size patch shares its field with other patches");
		}

		validate_location(target, first.width, edits, stream_len)?;

		let mut group_edits = Vec::with_capacity(group.len());
		for patch in &group {
			group_edits.push(find_edit(
				edits,
				&patch.zone,
				"size patch refers to an unknown zone",
			)?);
		}

		let value = match first.mode {
			SizeMode::Absolute => i128::from(group_edits[0].new_size()),
			SizeMode::DeltaAdd => {
				let original_value = match group.iter().find_map(|p| p.value) {
					Some(value) => value,
					None => read_original(original, target, first.width, first.endianness)?,
				};

				i128::from(original_value) + group_edits.iter().map(|e| e.delta()).sum::<i128>()
			},
		};

		let value = checked_value(value, first.width, target)?;

		log::trace!("Size patch @ {target}: new value {value}");
		writes.push(PatchWrite {
			offset: target,
			bytes: first.width.encode(value, first.endianness),
		});
	}

	writes.sort_by_key(|w| w.offset);
	for pair in writes.windows(2) {
		if pair[0].offset + pair[0].bytes.len() as u64 > pair[1].offset {
			surgery_err!(@PATCH pair[1].offset, "patch overlaps another patch");
		}
	}

	Ok(writes)
}

// Size patches targeting one field, in the order the fields were first seen
fn group_size_patches(patches: &[SizePatch]) -> Vec<(u64, Vec<&SizePatch>)> {
	let mut groups: Vec<(u64, Vec<&SizePatch>)> = Vec::new();

	for patch in patches {
		match groups.iter_mut().find(|(t, _)| *t == patch.target_offset) {
			Some((_, group)) => group.push(patch),
			None => groups.push((patch.target_offset, vec![patch])),
		}
	}

	groups
}

fn find_edit<'a, 'b>(
	edits: &'b [ZoneEdit<'a>],
	name: &str,
	reason: &'static str,
) -> Result<&'b ZoneEdit<'a>> {
	edits
		.iter()
		.find(|edit| edit.zone.name() == name)
		.ok_or_else(|| ZoneError::new(name, reason).into())
}

fn validate_location(
	target: u64,
	width: PatchWidth,
	edits: &[ZoneEdit<'_>],
	stream_len: u64,
) -> Result<()> {
	let Some(end) = target.checked_add(width.bytes()) else {
		surgery_err!(@PATCH target, "patch end overflows a u64");
	};

	if end > stream_len {
		return Err(SpliceError::truncated(end, stream_len));
	}

	// For insertion points (`offset == end`) this also catches fields straddling the insertion
	if edits
		.iter()
		.any(|edit| target < edit.zone.end() && end > edit.zone.offset)
	{
		surgery_err!(@PATCH target, "patch is located inside a zone");
	}

	Ok(())
}

fn read_original<R>(
	original: &mut R,
	target: u64,
	width: PatchWidth,
	endianness: Endianness,
) -> Result<u64>
where
	R: Read + Seek,
{
	original.seek(SeekFrom::Start(target))?;
	width.read(original, endianness)
}

fn checked_value(value: i128, width: PatchWidth, target: u64) -> Result<u64> {
	if value < 0 {
		surgery_err!(@PATCH target, "patched value would be negative");
	}

	match u64::try_from(value) {
		Ok(value) if value <= width.max_value() => Ok(value),
		_ => surgery_err!(@PATCH target, "patched value does not fit its width"),
	}
}

fn copy_gap<R, W>(
	original: &mut R,
	writer: &mut W,
	start: u64,
	end: u64,
	patches: &[PatchWrite],
) -> Result<()>
where
	R: Read + Seek,
	W: Write,
{
	if start >= end {
		return Ok(());
	}

	original.seek(SeekFrom::Start(start))?;

	let mut cursor = start;
	for patch in patches
		.iter()
		.filter(|patch| patch.offset >= start && patch.offset < end)
	{
		copy_exact(original, writer, patch.offset - cursor)?;
		writer.write_all(&patch.bytes)?;

		original.seek(SeekFrom::Current(patch.bytes.len() as i64))?;
		cursor = patch.offset + patch.bytes.len() as u64;
	}

	copy_exact(original, writer, end - cursor)
}

struct CountingWriter<'a, W> {
	inner: &'a mut W,
	written: u64,
}

impl<W> Write for CountingWriter<'_, W>
where
	W: Write,
{
	fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
		let written = self.inner.write(buf)?;
		self.written += written as u64;
		Ok(written)
	}

	fn flush(&mut self) -> std::io::Result<()> {
		self.inner.flush()
	}
}
