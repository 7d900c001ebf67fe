use super::Rule;
use crate::generator::{END, START};

fn start(property: &str) -> String {
    format!("{property}-{START}")
}

fn end(property: &str) -> String {
    format!("{property}-{END}")
}

fn box_rules(prefix: &str, property: &str) -> Vec<Rule> {
    let side = |suffix: &str, properties: Vec<String>| {
        Rule::pattern(&format!("{prefix}{suffix}"), properties)
            .suffix_to_value()
            .keyword("a", "auto")
    };
    vec![
        side("", vec![property.to_string()]),
        side("t", vec![format!("{property}-top")]),
        side("end", vec![end(property)]),
        side("b", vec![format!("{property}-bottom")]),
        side("start", vec![start(property)]),
        side("x", vec![start(property), end(property)]),
        side(
            "y",
            vec![format!("{property}-top"), format!("{property}-bottom")],
        ),
    ]
}

/// The built-in rule set.
pub fn defaults() -> Vec<Rule> {
    let mut rules = vec![
        Rule::pattern("D", ["display"])
            .keyword("n", "none")
            .keyword("b", "block")
            .keyword("i", "inline")
            .keyword("ib", "inline-block")
            .keyword("f", "flex")
            .keyword("if", "inline-flex")
            .keyword("g", "grid")
            .keyword("tb", "table")
            .keyword("tbc", "table-cell"),
        Rule::pattern("Pos", ["position"])
            .keyword("a", "absolute")
            .keyword("f", "fixed")
            .keyword("r", "relative")
            .keyword("s", "static")
            .keyword("st", "sticky"),
        Rule::pattern("Fl", ["float"])
            .keyword("n", "none")
            .keyword("start", START)
            .keyword("end", END),
        Rule::pattern("Cl", ["clear"])
            .keyword("n", "none")
            .keyword("b", "both")
            .keyword("start", START)
            .keyword("end", END),
        Rule::pattern("Ta", ["text-align"])
            .keyword("c", "center")
            .keyword("j", "justify")
            .keyword("start", START)
            .keyword("end", END),
        Rule::pattern("Op", ["opacity"]).suffix_to_value(),
        Rule::pattern("Z", ["z-index"])
            .suffix_to_value()
            .keyword("a", "auto"),
        Rule::pattern("W", ["width"])
            .suffix_to_value()
            .keyword("a", "auto")
            .keyword("fc", "fit-content"),
        Rule::pattern("H", ["height"])
            .suffix_to_value()
            .keyword("a", "auto"),
        Rule::pattern("Maw", ["max-width"])
            .suffix_to_value()
            .keyword("n", "none"),
        Rule::pattern("Mah", ["max-height"])
            .suffix_to_value()
            .keyword("n", "none"),
        Rule::pattern("Miw", ["min-width"]).suffix_to_value(),
        Rule::pattern("Mih", ["min-height"]).suffix_to_value(),
    ];
    rules.extend(box_rules("M", "margin"));
    rules.extend(box_rules("P", "padding"));
    rules.extend([
        Rule::pattern("C", ["color"])
            .suffix_to_value()
            .keyword("t", "transparent")
            .keyword("cc", "currentColor"),
        Rule::pattern("Bgc", ["background-color"])
            .suffix_to_value()
            .keyword("t", "transparent")
            .keyword("cc", "currentColor"),
        Rule::pattern("Bdrs", ["border-radius"]).suffix_to_value(),
        Rule::pattern("Fz", ["font-size"]).suffix_to_value(),
        Rule::pattern("Fw", ["font-weight"])
            .suffix_to_value()
            .keyword("n", "normal")
            .keyword("b", "bold")
            .keyword("br", "bolder")
            .keyword("lr", "lighter"),
        Rule::pattern("Lh", ["line-height"])
            .suffix_to_value()
            .keyword("n", "normal"),
        Rule::pattern("Ov", ["overflow"])
            .keyword("a", "auto")
            .keyword("h", "hidden")
            .keyword("s", "scroll")
            .keyword("v", "visible"),
        Rule::pattern("Cur", ["cursor"])
            .keyword("a", "auto")
            .keyword("d", "default")
            .keyword("p", "pointer")
            .keyword("na", "not-allowed"),
        Rule::helper(
            "LineClamp",
            [("-webkit-line-clamp", "$0"), ("max-height", "$1")],
        )
        .sub_rule(
            "[class*=LineClamp]",
            [
                ("display", "-webkit-box"),
                ("-webkit-box-orient", "vertical"),
                ("overflow", "hidden"),
            ],
        )
        .sub_rule("a[class*=LineClamp]", [("display", "-webkit-box")]),
        Rule::helper(
            "Ell",
            [
                ("max-width", "100%"),
                ("white-space", "nowrap"),
                ("overflow", "hidden"),
                ("text-overflow", "ellipsis"),
            ],
        ),
        Rule::helper("Cf", [("zoom", "1")]).sub_rule(
            ".Cf\\(\\):before, .Cf\\(\\):after",
            [("content", "\" \""), ("display", "table")],
        )
        .sub_rule(".Cf\\(\\):after", [("clear", "both")]),
        Rule::helper(
            "Hidden",
            [
                ("position", "absolute !important"),
                ("clip", "rect(1px,1px,1px,1px)"),
                ("width", "1px"),
                ("height", "1px"),
                ("overflow", "hidden"),
            ],
        ),
    ]);
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Registry;

    #[test]
    fn defaults_register_without_conflicts() {
        let registry = Registry::new(defaults()).unwrap();
        assert!(registry.get("Mstart").is_some());
        assert!(registry.get("LineClamp").unwrap().is_helper());
    }

    #[test]
    fn directional_rules_use_placeholders() {
        let registry = Registry::new(defaults()).unwrap();
        let mx = registry.get("Mx").unwrap();
        assert_eq!(mx.properties, ["margin-__START__", "margin-__END__"]);
        assert_eq!(registry.get("Fl").unwrap().keyword_value("start"), Some(START));
    }
}
