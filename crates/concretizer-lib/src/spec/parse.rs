//! Parsing of the spec syntax.

use super::{Spec, CompilerSpec};
use crate::variant::VariantSpec;
use crate::version::VersionConstraint;

/// Characters that begin a new token.
const SIGILS: &[char] = &['@', '%', '+', '~', '^'];

fn is_name_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

pub(super) fn parse_spec(text: &str) -> crate::Result<Spec> {
	if text.trim().is_empty() {
		return Err(crate::Error::Parse("spec can't be empty".to_string()));
	}

	let mut nodes = text.split('^');
	/* `split` always yields at least once */
	let mut root = parse_node(nodes.next().unwrap_or_default(), text, true)?;
	for node in nodes {
		let dep = parse_node(node, text, false)?;
		if let Some(existing) = root.dependencies.iter_mut().find(|d| d.name == dep.name) {
			existing.constrain(&dep)?;
		} else {
			root.dependencies.push(dep);
		}
	}
	Ok(root)
}

struct Cursor<'a> {
	chars: std::iter::Peekable<std::str::Chars<'a>>,
}

impl<'a> Cursor<'a> {
	fn skip_whitespace(&mut self) {
		while self.chars.next_if(|c| c.is_whitespace()).is_some() {}
	}

	fn take_while(&mut self, f: impl Fn(char) -> bool) -> String {
		let mut s = String::new();
		while let Some(c) = self.chars.next_if(|c| f(*c)) {
			s.push(c);
		}
		s
	}

	fn name(&mut self) -> String {
		self.take_while(is_name_char)
	}

	/// Everything up to the next sigil or whitespace.
	fn word(&mut self) -> String {
		self.take_while(|c| !c.is_whitespace() && !SIGILS.contains(&c))
	}
}

fn parse_node(node: &str, text: &str, is_root: bool) -> crate::Result<Spec> {
	use crate::Error::Parse;

	let mut spec = Spec::default();
	let mut cursor = Cursor { chars: node.chars().peekable() };
	let mut has_versions = false;
	let mut first = true;

	loop {
		cursor.skip_whitespace();
		let Some(&c) = cursor.chars.peek() else { break };

		match c {
			'@' => {
				cursor.chars.next();
				if has_versions {
					return Err(Parse(format!("versions given twice in \"{}\"", text)));
				}
				spec.versions = VersionConstraint::parse(&cursor.word())?;
				has_versions = true;
			},
			'%' => {
				cursor.chars.next();
				if spec.compiler.is_some() {
					return Err(Parse(format!("compiler given twice in \"{}\"", text)));
				}
				let name = cursor.name();
				if name.is_empty() {
					return Err(Parse(format!("expected a compiler name after '%' in \"{}\"", text)));
				}
				let versions = if cursor.chars.next_if_eq(&'@').is_some() {
					VersionConstraint::parse(&cursor.word())?
				} else {
					VersionConstraint::any()
				};
				spec.compiler = Some(CompilerSpec::new(&name, versions));
			},
			'+' | '~' => {
				cursor.chars.next();
				let name = cursor.name();
				if name.is_empty() {
					return Err(Parse(format!("expected a variant name after '{}' in \"{}\"", c, text)));
				}
				/* `+name=value` is accepted as a spelling of `name=value` */
				if c == '+' && cursor.chars.next_if_eq(&'=').is_some() {
					let value = cursor.word();
					spec.variants.insert(VariantSpec::new(&name, value.as_str()))?;
				} else {
					spec.variants.insert(VariantSpec::new(&name, c == '+'))?;
				}
			},
			c if is_name_char(c) => {
				let name = cursor.name();
				if cursor.chars.next_if_eq(&'=').is_some() {
					let value = cursor.word();
					spec.variants.insert(VariantSpec::new(&name, value.as_str()))?;
				} else if first {
					spec.name = Some(name);
				} else {
					return Err(Parse(format!("unexpected name \"{}\" in \"{}\"", name, text)));
				}
			},
			c => return Err(Parse(format!("unexpected character '{}' in \"{}\"", c, text))),
		}
		first = false;
	}

	if first && !is_root {
		return Err(Parse(format!("expected a dependency after '^' in \"{}\"", text)));
	}
	if !is_root && spec.name.is_none() {
		return Err(Parse(format!("dependency in \"{}\" needs a name", text)));
	}
	Ok(spec)
}
