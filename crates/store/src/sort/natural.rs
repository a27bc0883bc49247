//! Case-insensitive, numeric-aware segment comparison.
//!
//! Digit runs compare by numeric value so `b9` sorts before `b10`; other
//! characters compare by their lowercase form, so case differences alone
//! compare equal while accents stay significant.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

pub(crate) fn natural_cmp(a: &str, b: &str) -> Ordering {
	let mut a = a.chars().peekable();
	let mut b = b.chars().peekable();
	loop {
		match (a.peek().copied(), b.peek().copied()) {
			(None, None) => return Ordering::Equal,
			(None, Some(_)) => return Ordering::Less,
			(Some(_), None) => return Ordering::Greater,
			(Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
				let ord = cmp_digit_runs(&digit_run(&mut a), &digit_run(&mut b));
				if ord != Ordering::Equal {
					return ord;
				}
			}
			(Some(x), Some(y)) => {
				a.next();
				b.next();
				let ord = x.to_lowercase().cmp(y.to_lowercase());
				if ord != Ordering::Equal {
					return ord;
				}
			}
		}
	}
}

fn digit_run(chars: &mut Peekable<Chars<'_>>) -> String {
	let mut run = String::new();
	while let Some(c) = chars.next_if(char::is_ascii_digit) {
		run.push(c);
	}
	run
}

/// Compares two digit strings by value without parsing, so arbitrarily long
/// runs cannot overflow.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
	let a = a.trim_start_matches('0');
	let b = b.trim_start_matches('0');
	a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
