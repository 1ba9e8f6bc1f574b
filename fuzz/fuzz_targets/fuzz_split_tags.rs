//! Fuzz target for tag-string parsing.
//!
//! Feeds arbitrary strings through `split_tags` to find:
//! - Panics on malformed or non-ASCII input
//! - Violations of the token invariants (no empties, no separators,
//!   no surrounding whitespace, no duplicates)
//!
//! # Running
//!
//! ```bash
//! cd fuzz
//! cargo +nightly fuzz run fuzz_split_tags
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use tagrec_core::dataset::split_tags;

fuzz_target!(|raw: &str| {
    let tags = split_tags(raw);

    for tag in &tags {
        assert!(!tag.is_empty());
        assert_eq!(tag.trim(), tag.as_str());
        assert!(!tag.contains([',', '|', '/']));
    }

    // Parsing must be idempotent over its own output.
    let rejoined = tags.join(",");
    assert_eq!(split_tags(&rejoined), tags);
});
