#![no_main]

use libfuzzer_sys::fuzz_target;
use mips_core::{decode_program, format_instruction, parse_word, Decoder, Machine};

fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let base_pc = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);

    let words: Vec<u32> = data[4..]
        .chunks_exact(4)
        .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    for &word in &words {
        let decoded = Decoder::decode(word);
        let _ = format_instruction(&decoded);
        let _ = decoded.encode();
    }

    let _ = decode_program(&words, base_pc);

    let mut machine = Machine::with_base_pc(words, base_pc);
    let _ = mips_core::run(&mut machine, 256);

    if let Ok(text) = std::str::from_utf8(data) {
        for line in text.lines() {
            let _ = parse_word(line);
        }
    }
});
