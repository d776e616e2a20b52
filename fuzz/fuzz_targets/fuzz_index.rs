#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Build an index over arbitrary sentinel-free bytes and cross-check a
    // handful of queries against naive scanning
    if data.len() > 2048 || data.contains(&0) {
        return;
    }

    let Ok(index) = fmx::FmIndex::build(data) else {
        return;
    };

    assert_eq!(index.reconstruct_text(), data);
    assert_eq!(index.count(b"").unwrap(), data.len());

    for len in [1usize, 2, 5] {
        if data.len() < len {
            break;
        }
        let pattern = &data[..len];
        let expected = (0..=data.len() - len)
            .filter(|&i| &data[i..i + len] == pattern)
            .count();
        assert_eq!(index.count(pattern).unwrap(), expected);
    }
});
