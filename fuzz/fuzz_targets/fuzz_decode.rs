#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    match ftm_format::decode(data) {
        Ok(module) => {
            // Walk every cell the song order can reach.
            let view = module.playback();
            for frame in 0..view.frames() {
                for row in 0..view.pattern_length() {
                    let _ = view.row(frame, row);
                }
            }
        }
        Err(err) => assert!(err.offset() <= data.len()),
    }
});
