//! Named timing functions.
//!
//! Curves are opaque CSS strings; nothing here evaluates them. The table has
//! the CSS defaults plus the Penner families, each with an in, out and in-out
//! curve. Flattened names put the curve first: `cubic` / `easeIn` becomes
//! `easeInCubic`.

use std::sync::OnceLock;

use indexmap::IndexMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Curve {
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Curve {
    pub const ALL: [Curve; 3] = [Curve::EaseIn, Curve::EaseOut, Curve::EaseInOut];

    pub fn name(self) -> &'static str {
        match self {
            Curve::EaseIn => "easeIn",
            Curve::EaseOut => "easeOut",
            Curve::EaseInOut => "easeInOut",
        }
    }
}

/// One Penner family: in, out and in-out as cubic-bezier strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Family {
    pub name: &'static str,
    pub ease_in: &'static str,
    pub ease_out: &'static str,
    pub ease_in_out: &'static str,
}

impl Family {
    pub fn curve(&self, curve: Curve) -> &'static str {
        match curve {
            Curve::EaseIn => self.ease_in,
            Curve::EaseOut => self.ease_out,
            Curve::EaseInOut => self.ease_in_out,
        }
    }
}

pub const DEFAULTS: &[(&str, &str)] = &[
    ("linear", "linear"),
    ("ease", "ease"),
    ("easeIn", "ease-in"),
    ("easeOut", "ease-out"),
    ("easeInOut", "ease-in-out"),
];

pub const FAMILIES: &[Family] = &[
    Family {
        name: "cubic",
        ease_in: "cubic-bezier(.55,.055,.675,.19)",
        ease_out: "cubic-bezier(.215,.61,.355,1)",
        ease_in_out: "cubic-bezier(.645,.045,.355,1)",
    },
    Family {
        name: "circ",
        ease_in: "cubic-bezier(.6,.04,.98,.335)",
        ease_out: "cubic-bezier(.075,.82,.165,1)",
        ease_in_out: "cubic-bezier(.785,.135,.15,.86)",
    },
    Family {
        name: "expo",
        ease_in: "cubic-bezier(.95,.05,.795,.035)",
        ease_out: "cubic-bezier(.19,1,.22,1)",
        ease_in_out: "cubic-bezier(1,0,0,1)",
    },
    Family {
        name: "quad",
        ease_in: "cubic-bezier(.55,.085,.68,.53)",
        ease_out: "cubic-bezier(.25,.46,.45,.94)",
        ease_in_out: "cubic-bezier(.455,.03,.515,.955)",
    },
    Family {
        name: "quart",
        ease_in: "cubic-bezier(.895,.03,.685,.22)",
        ease_out: "cubic-bezier(.165,.84,.44,1)",
        ease_in_out: "cubic-bezier(.77,0,.175,1)",
    },
    Family {
        name: "quint",
        ease_in: "cubic-bezier(.755,.05,.855,.06)",
        ease_out: "cubic-bezier(.23,1,.32,1)",
        ease_in_out: "cubic-bezier(.86,0,.07,1)",
    },
    Family {
        name: "sine",
        ease_in: "cubic-bezier(.47,0,.745,.715)",
        ease_out: "cubic-bezier(.39,.575,.565,1)",
        ease_in_out: "cubic-bezier(.445,.05,.55,.95)",
    },
    Family {
        name: "back",
        ease_in: "cubic-bezier(.6,-.28,.735,.045)",
        ease_out: "cubic-bezier(.175, .885,.32,1.275)",
        ease_in_out: "cubic-bezier(.68,-.55,.265,1.55)",
    },
];

pub fn family(name: &str) -> Option<&'static Family> {
    FAMILIES.iter().find(|f| f.name == name)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Flattened name → CSS timing function, defaults first.
pub fn timing_table() -> &'static IndexMap<String, &'static str> {
    static TABLE: OnceLock<IndexMap<String, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table: IndexMap<String, &'static str> = DEFAULTS
            .iter()
            .map(|(name, css)| (name.to_string(), *css))
            .collect();
        for f in FAMILIES {
            for curve in Curve::ALL {
                table.insert(
                    format!("{}{}", curve.name(), capitalize(f.name)),
                    f.curve(curve),
                );
            }
        }
        table
    })
}

/// Resolves a timing token to a CSS timing function.
///
/// Accepts flattened names (`easeInCubic`), dotted family paths
/// (`cubic.easeIn`) and the defaults (`linear`). Anything else is assumed to
/// already be a raw CSS expression and is returned untouched.
pub fn resolve_timing_function(token: &str) -> &str {
    if let Some(css) = timing_table().get(token) {
        return *css;
    }
    if let Some((fam, curve)) = token.split_once('.')
        && let Some(f) = family(fam)
        && let Some(c) = Curve::ALL.into_iter().find(|c| c.name() == curve)
    {
        return f.curve(c);
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_to_css_keywords() {
        assert_eq!(resolve_timing_function("linear"), "linear");
        assert_eq!(resolve_timing_function("easeInOut"), "ease-in-out");
    }

    #[test]
    fn flattened_and_dotted_names_agree() {
        assert_eq!(
            resolve_timing_function("easeInCubic"),
            "cubic-bezier(.55,.055,.675,.19)"
        );
        assert_eq!(
            resolve_timing_function("cubic.easeIn"),
            "cubic-bezier(.55,.055,.675,.19)"
        );
        assert_eq!(
            resolve_timing_function("back.easeOut"),
            resolve_timing_function("easeOutBack")
        );
    }

    #[test]
    fn unknown_tokens_pass_through() {
        assert_eq!(
            resolve_timing_function("cubic-bezier(0,0,1,1)"),
            "cubic-bezier(0,0,1,1)"
        );
        assert_eq!(resolve_timing_function("cubic.sideways"), "cubic.sideways");
        assert_eq!(resolve_timing_function("steps(4, end)"), "steps(4, end)");
    }

    #[test]
    fn table_has_every_family_curve() {
        let table = timing_table();
        assert_eq!(table.len(), DEFAULTS.len() + FAMILIES.len() * 3);
        assert_eq!(table.get_index(0).map(|(k, _)| k.as_str()), Some("linear"));
        assert_eq!(table["easeInOutExpo"], "cubic-bezier(1,0,0,1)");
    }
}
