//! Class vocabulary of typeset math.

/// CSS classes KaTeX puts on the `<span>`s it emits.
///
/// Allowed on `span` when math is enabled, so typeset formulas keep their
/// layout after sanitization.
pub const KATEX_CLASSES: &[&str] = &[
    "katex",
    "katex-display",
    "katex-error",
    "katex-html",
    "katex-mathml",
    "katex-version",
    "accent",
    "accent-body",
    "accent-full",
    "allowbreak",
    "amsrm",
    "anglepad",
    "arraycolsep",
    "base",
    "bcancel",
    "boldsymbol",
    "boxpad",
    "brace-center",
    "brace-left",
    "brace-right",
    "cancel-lap",
    "cancel-pad",
    "cd-arrow-pad",
    "cd-label-left",
    "cd-label-right",
    "cd-vert-arrow",
    "centered",
    "clap",
    "col-align-c",
    "col-align-l",
    "col-align-r",
    "delimcenter",
    "delimsizing",
    "enclosing",
    "eqn-num",
    "fbox",
    "fcolorbox",
    "fix",
    "fleqn",
    "fontsize-ensurer",
    "frac-line",
    "halfarrow-left",
    "halfarrow-right",
    "hbox",
    "hdashline",
    "hide-tail",
    "hline",
    "inner",
    "large-op",
    "leqno",
    "llap",
    "mainrm",
    "mathbb",
    "mathbf",
    "mathboldfrak",
    "mathboldscr",
    "mathboldsf",
    "mathcal",
    "mathfrak",
    "mathit",
    "mathitsf",
    "mathnormal",
    "mathrm",
    "mathscr",
    "mathsf",
    "mathtt",
    "mbin",
    "mclose",
    "mfrac",
    "minner",
    "mml-eqn-num",
    "mop",
    "mopen",
    "mord",
    "mover",
    "mpunct",
    "mrel",
    "mspace",
    "msupsub",
    "mtable",
    "mtight",
    "munder",
    "newline",
    "nobreak",
    "nulldelimiter",
    "op-limits",
    "op-symbol",
    "overlay",
    "overline",
    "overline-line",
    "pstrut",
    "reset-size1",
    "reset-size2",
    "reset-size3",
    "reset-size4",
    "reset-size5",
    "reset-size6",
    "reset-size7",
    "reset-size8",
    "reset-size9",
    "reset-size10",
    "reset-size11",
    "rlap",
    "root",
    "rule",
    "size1",
    "size2",
    "size3",
    "size4",
    "size5",
    "size6",
    "size7",
    "size8",
    "size9",
    "size10",
    "size11",
    "sizing",
    "small-op",
    "sout",
    "sqrt",
    "stretchy",
    "strut",
    "svg-align",
    "tag",
    "text",
    "textbf",
    "textboldsf",
    "textit",
    "textitsf",
    "textrm",
    "textsf",
    "texttt",
    "thinbox",
    "underline",
    "underline-line",
    "vertical-separator",
    "vlist",
    "vlist-r",
    "vlist-s",
    "vlist-t",
    "vlist-t2",
    "x-arrow",
    "x-arrow-pad",
    "xcancel",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn classes_are_unique() {
        let unique: HashSet<_> = KATEX_CLASSES.iter().collect();
        assert_eq!(unique.len(), KATEX_CLASSES.len());
    }

    #[test]
    fn core_layout_classes_present() {
        for class in ["katex", "katex-display", "mord", "vlist-t", "strut", "text"] {
            assert!(KATEX_CLASSES.contains(&class), "{class}");
        }
    }
}
