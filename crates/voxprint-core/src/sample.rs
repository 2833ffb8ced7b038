//! Stratified temporal sampling for profile construction.
//!
//! A profile built only from an account's most recent posts reflects its
//! most recent style. To avoid that recency bias, the sampler partitions
//! the chronological record sequence into three contiguous equal chunks
//! (early / middle / late) and draws from each.

use rand::Rng;

use crate::record::SourceRecord;

/// Select `size` records from a chronologically ordered slice.
///
/// - `records.len() <= size`: every record is returned, no sampling.
/// - Otherwise the slice splits into three contiguous chunks (the last
///   chunk absorbs the remainder rows); roughly `size / 3` records are
///   drawn uniformly without replacement from each of the first two
///   chunks, and the final chunk contributes whatever is still needed to
///   reach exactly `size`.
///
/// If a chunk holds fewer rows than its quota the total falls short of
/// `size` rather than borrowing from other chunks; with the equal-chunk
/// split this only occurs for degenerate inputs. Within a chunk the
/// drawn records keep chronological order; chunks are visited early to
/// late.
pub fn stratified_sample<R: Rng>(
  records: &[SourceRecord],
  size: usize,
  rng: &mut R,
) -> Vec<SourceRecord> {
  if records.len() <= size {
    return records.to_vec();
  }

  let chunk_size = records.len() / 3;
  let bounds = [
    (0, chunk_size),
    (chunk_size, 2 * chunk_size),
    (2 * chunk_size, records.len()),
  ];

  let mut samples: Vec<SourceRecord> = Vec::with_capacity(size);
  for (i, (start, end)) in bounds.into_iter().enumerate() {
    let chunk = &records[start..end];
    let quota = if i < 2 { size / 3 } else { size - samples.len() };
    let amount = quota.min(chunk.len());

    let mut picks: Vec<usize> =
      rand::seq::index::sample(rng, chunk.len(), amount).into_vec();
    picks.sort_unstable();
    samples.extend(picks.into_iter().map(|idx| chunk[idx].clone()));
  }

  samples
}
