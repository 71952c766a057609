//--> Type Aliases <--

pub type ASCIIString = Vec<u8>;

//--> Functions <--

fn ascii_to_byte(c: char) -> Option<u8> {
	if c.is_ascii() { Some(c as u8) } else { None }
}

// The character after a backslash, for every escape but `\x`.
fn escape_to_byte(c: char) -> Option<u8> {
	match c {
		'0' => Some(0x00),
		'a' => Some(0x07),
		'b' => Some(0x08),
		't' => Some(0x09),
		'n' => Some(0x0a),
		'v' => Some(0x0b),
		'f' => Some(0x0c),
		'r' => Some(0x0d),
		'e' => Some(0x1b),
		'"' => Some(0x22),
		'\'' => Some(0x27),
		'\\' => Some(0x5c),
		_ => None
	}
}

/// Turns the body of a string literal into ASCII bytes, resolving escape sequences.
pub fn make_ascii_string(s: &str) -> Option<ASCIIString> {
	let mut chars = s.chars();
	let mut string: ASCIIString = Vec::new();

	while let Some(c) = chars.next() {
		if c == '\\' {
			match chars.next()? {
				'x' => {
					let value_string: String = [chars.next()?, chars.next()?].iter().collect();

					string.push(u8::from_str_radix(&value_string, 16).ok()?);
				},
				e => string.push(escape_to_byte(e)?)
			}
		} else { string.push(ascii_to_byte(c)?); }
	}

	Some(string)
}

/// Turns the body of a character literal into exactly one ASCII byte.
pub fn make_ascii_character(s: &str) -> Option<u8> {
	match make_ascii_string(s)?.as_slice() {
		[b] => Some(*b),
		_ => None
	}
}

/// Renders bytes as the body of a string literal that `make_ascii_string` turns back into the same bytes.
pub fn escape_ascii(bytes: &[u8]) -> String {
	let mut s = String::with_capacity(bytes.len());

	for &b in bytes {
		match b {
			0x00 => s.push_str("\\0"),
			0x09 => s.push_str("\\t"),
			0x0a => s.push_str("\\n"),
			0x0d => s.push_str("\\r"),
			0x22 => s.push_str("\\\""),
			0x5c => s.push_str("\\\\"),
			0x20..=0x7e => s.push(b as char),
			_ => s.push_str(&format!("\\x{:02x}", b))
		}
	}

	s
}
