// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::fmt::Write;

/// Renders `data` as an offset-prefixed hex dump, 16 bytes per line, for
/// tracing a response that did not decode the way it should have.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len() * 3 + 8);
    for (i, chunk) in data.chunks(16).enumerate() {
        if i != 0 {
            out.push('\n');
        }
        write!(&mut out, "{:04x}:", i * 16).expect("Writing to String cannot fail");
        for byte in chunk {
            write!(&mut out, " {byte:02x}").expect("Writing to String cannot fail");
        }
    }
    out
}
