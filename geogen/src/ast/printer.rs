//! The canonical string converter.
//!
//! Two configurations produce the same canonical key exactly when they are
//! equal up to a permutation of loose objects preserving the layout's
//! symmetry group. The converter is parameterised by a loose-identifier
//! remapping; the least-configuration finder tries every remapping the
//! symmetry group admits and keeps the lexicographically smallest string.

use super::{Argument, ConfigObject, Configuration, ObjectId};
use ahash::AHashMap;

/// Converts objects of one configuration to strings under a fixed
/// loose-identifier remapping. Object strings are memoized per printer, so
/// the memoization is per (object, remapping) pair.
pub struct CanonicalPrinter<'a> {
    config: &'a Configuration,
    remap: &'a [usize],
    cache: AHashMap<ObjectId, String>,
}

impl<'a> CanonicalPrinter<'a> {
    pub fn new(config: &'a Configuration, remap: &'a [usize]) -> CanonicalPrinter<'a> {
        assert_eq!(
            remap.len(),
            config.loose_count(),
            "remapping must cover all loose objects"
        );
        CanonicalPrinter { config, remap, cache: AHashMap::new() }
    }

    /// The string of one object: loose objects print as their remapped
    /// identifier, constructed objects as `name(args)` with a `[index]`
    /// suffix for the non-zero outputs of multi-output constructions.
    pub fn object_string(&mut self, id: ObjectId) -> String {
        if let Some(cached) = self.cache.get(&id) {
            return cached.clone();
        }
        let string = match self.config.get(id) {
            ConfigObject::Loose { .. } => self.remap[id.0].to_string(),
            ConfigObject::Constructed(c) => {
                let args: Vec<String> = c.args.iter().map(|a| self.argument_string(a)).collect();
                let mut s = format!("{}({})", c.construction.name(), args.join(","));
                if c.output_index != 0 {
                    s.push_str(&format!("[{}]", c.output_index));
                }
                s
            }
        };
        self.cache.insert(id, string.clone());
        string
    }

    /// Set arguments canonicalize to the sorted tuple of their inner strings.
    fn argument_string(&mut self, arg: &Argument) -> String {
        match arg {
            Argument::Object(id) => self.object_string(*id),
            Argument::Set(elements) => {
                let mut inner: Vec<String> =
                    elements.iter().map(|e| self.argument_string(e)).collect();
                inner.sort();
                format!("{{{}}}", inner.join(","))
            }
        }
    }

    /// The string of the whole configuration: the layout tag, the sorted
    /// strings of the constructed objects joined by `|`, and the remapped
    /// loose-object sequence. The loose sequence comes last so that
    /// comparing two strings compares the constructed bodies first and uses
    /// the remapping only as a tie-break.
    pub fn configuration_string(&mut self) -> String {
        let mut parts: Vec<String> = self
            .config
            .constructed()
            .map(|(id, _)| self.object_string(id))
            .collect();
        parts.sort();
        let mut key = self.config.layout().name().to_owned();
        for part in parts {
            key.push('|');
            key.push_str(&part);
        }
        let loose: Vec<String> = self.remap.iter().map(|id| id.to_string()).collect();
        key.push_str(&format!("|[{}]", loose.join(",")));
        key
    }
}

/// Finds the canonical key of a configuration: the lexicographically smallest
/// configuration string over all remappings consistent with the layout's
/// symmetry group. Returns the key together with the winning remapping, which
/// the generator then applies to rewrite identifiers into canonical form.
///
/// Because the constructed bodies precede the loose sequence in the string,
/// the winning remapping is the one presenting the constructed objects in
/// their least form; configurations reached along different construction
/// orders or argument presentations therefore agree on their key.
pub fn least_configuration(config: &Configuration) -> (String, &'static [usize]) {
    let mut best: Option<(String, &'static [usize])> = None;
    for &perm in config.layout().symmetries() {
        let key = CanonicalPrinter::new(config, perm).configuration_string();
        match &best {
            Some((smallest, _)) if *smallest <= key => {}
            _ => best = Some((key, perm)),
        }
    }
    // Every layout has at least the identity symmetry.
    best.expect("layout with no symmetries")
}
