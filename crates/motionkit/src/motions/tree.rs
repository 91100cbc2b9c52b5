use editor_types::prelude::{ObjectScope, Selection, TextRange};
use editor_types::Document;

use crate::editing::syntax::{NodeId, SyntaxTree};

const FUNCTION_KINDS: [&str; 6] = [
    "function_definition",
    "function_declaration",
    "function_expression",
    "function_item",
    "method_definition",
    "arrow_function",
];

const ELEMENT_KINDS: [&str; 4] = ["jsx_element", "jsx_self_closing_element", "element", "self_closing_tag"];

const SELF_CLOSING_KINDS: [&str; 2] = ["jsx_self_closing_element", "self_closing_tag"];

const COMMENT_KINDS: [&str; 3] = ["comment", "line_comment", "block_comment"];

const PARAMETER_KINDS: [&str; 8] = [
    "parameter",
    "typed_parameter",
    "required_parameter",
    "typed_required_parameter",
    "default_parameter",
    "typed_default_parameter",
    "optional_parameter",
    "typed_optional_parameter",
];

const PROPERTY_KINDS: [&str; 8] = [
    "pair",
    "property_signature",
    "public_field_definition",
    "field_declaration",
    "field_initializer",
    "shorthand_property_identifier",
    "jsx_attribute",
    "attribute",
];

const ARGUMENT_LIST_KINDS: [&str; 2] = ["arguments", "argument_list"];

fn is_kind(tree: &dyn SyntaxTree, node: NodeId, kinds: &[&str]) -> bool {
    kinds.contains(&tree.kind(node))
}

fn is_comment(tree: &dyn SyntaxTree, node: NodeId) -> bool {
    is_kind(tree, node, &COMMENT_KINDS)
}

fn is_property_or_parameter(tree: &dyn SyntaxTree, node: NodeId) -> bool {
    if is_kind(tree, node, &PROPERTY_KINDS) || is_kind(tree, node, &PARAMETER_KINDS) {
        return true;
    }

    // Arguments don't have a kind of their own, so look at where they are.
    tree.is_named(node) &&
        tree.parent(node).map(|p| is_kind(tree, p, &ARGUMENT_LIST_KINDS)).unwrap_or(false)
}

/// Walk up from a node until reaching one that satisfies `pred`.
fn climb<F>(tree: &dyn SyntaxTree, mut node: NodeId, pred: F) -> Option<NodeId>
where
    F: Fn(NodeId) -> bool,
{
    loop {
        if pred(node) {
            return Some(node);
        }

        node = tree.parent(node)?;
    }
}

fn node_at(tree: &dyn SyntaxTree, sel: &Selection) -> Option<NodeId> {
    tree.named_descendant_for_range(&sel.range())
}

fn select(range: TextRange) -> Vec<Selection> {
    vec![Selection::from(range)]
}

pub(super) fn node_motion(sel: &Selection, tree: &dyn SyntaxTree) -> Vec<Selection> {
    match node_at(tree, sel) {
        Some(node) => select(tree.range(node)),
        None => vec![],
    }
}

pub(super) fn function_motion(sel: &Selection, tree: &dyn SyntaxTree) -> Vec<Selection> {
    let Some(node) = node_at(tree, sel) else {
        return vec![];
    };

    match climb(tree, node, |n| is_kind(tree, n, &FUNCTION_KINDS)) {
        Some(func) => select(tree.range(func)),
        None => vec![],
    }
}

pub(super) fn element_motion(
    scope: ObjectScope,
    sel: &Selection,
    tree: &dyn SyntaxTree,
) -> Vec<Selection> {
    let Some(node) = node_at(tree, sel) else {
        return vec![];
    };

    let Some(element) = climb(tree, node, |n| is_kind(tree, n, &ELEMENT_KINDS)) else {
        return vec![];
    };

    match scope {
        ObjectScope::Around => select(tree.range(element)),
        ObjectScope::Inside => {
            if is_kind(tree, element, &SELF_CLOSING_KINDS) {
                return vec![];
            }

            // Everything between the opening and closing tags.
            let children = tree.children(element);

            match (children.first(), children.last()) {
                (Some(open), Some(close)) if children.len() >= 2 => {
                    let start = tree.range(*open).end;
                    let end = tree.range(*close).start;

                    select(TextRange::new(start, end))
                },
                _ => vec![],
            }
        },
    }
}

fn is_line_comment(tree: &dyn SyntaxTree, doc: &dyn Document, node: NodeId) -> bool {
    if !is_comment(tree, node) {
        return false;
    }

    let text = doc.text_in(&tree.range(node));

    text.starts_with("//") || text.starts_with('#')
}

/// Select the comment under the cursor, along with any line comments directly above or below.
pub(super) fn comment_motion(
    sel: &Selection,
    doc: &dyn Document,
    tree: &dyn SyntaxTree,
) -> Vec<Selection> {
    let Some(node) = node_at(tree, sel) else {
        return vec![];
    };

    if !is_comment(tree, node) {
        return vec![];
    }

    let mut first = node;
    let mut last = node;

    if is_line_comment(tree, doc, node) {
        while let Some(prev) = tree.prev_sibling(first) {
            let adjacent = tree.range(prev).end.line + 1 >= tree.range(first).start.line;

            if !adjacent || !is_line_comment(tree, doc, prev) {
                break;
            }

            first = prev;
        }

        while let Some(next) = tree.next_sibling(last) {
            let adjacent = tree.range(last).end.line + 1 >= tree.range(next).start.line;

            if !adjacent || !is_line_comment(tree, doc, next) {
                break;
            }

            last = next;
        }
    }

    select(TextRange::new(tree.range(first).start, tree.range(last).end))
}

/// Select the property, parameter or argument under the cursor.
///
/// Selecting around one also takes the separator after it, or, for the last item in a list, the
/// comma before it, so that deleting the selection leaves a valid list.
pub(super) fn property_or_parameter_motion(
    scope: ObjectScope,
    sel: &Selection,
    doc: &dyn Document,
    tree: &dyn SyntaxTree,
) -> Vec<Selection> {
    let Some(node) = node_at(tree, sel) else {
        return vec![];
    };

    let Some(item) = climb(tree, node, |n| is_property_or_parameter(tree, n)) else {
        return vec![];
    };

    let mut range = tree.range(item);

    if scope == ObjectScope::Around {
        let text_of = |n: NodeId| doc.text_in(&tree.range(n));

        match tree.next_sibling(item) {
            Some(next) if matches!(text_of(next).as_str(), "," | ";") => {
                range.end = tree.range(next).end;
            },
            _ => {
                if let Some(prev) = tree.prev_sibling(item).filter(|p| text_of(*p) == ",") {
                    range.start = tree.range(prev).start;
                }
            },
        }
    }

    return select(range);
}

#[cfg(test)]
mod tests {
    use editor_types::prelude::{ObjectScope, Position, TextRange};

    use crate::editing::syntax::{tests::call_tree, SyntaxArena, SyntaxTree};
    use crate::motions::MotionSpec;

    macro_rules! range {
        ($sl: expr, $sc: expr, $el: expr, $ec: expr) => {
            TextRange::new(Position::new($sl, $sc), Position::new($el, $ec))
        };
    }

    fn function_tree() -> SyntaxArena {
        // fn main() {
        //     let x = 1;
        // }
        let mut tree = SyntaxArena::new("source_file", range!(0, 0, 3, 0));
        let root = tree.root();
        let func = tree.add(root, "function_item", range!(0, 0, 2, 1));
        tree.add(func, "identifier", range!(0, 3, 0, 7));
        tree.add(func, "parameters", range!(0, 7, 0, 9));
        let block = tree.add(func, "block", range!(0, 10, 2, 1));
        let stmt = tree.add(block, "let_declaration", range!(1, 4, 1, 14));
        tree.add(stmt, "identifier", range!(1, 8, 1, 9));
        tree.add(stmt, "integer_literal", range!(1, 12, 1, 13));
        tree
    }

    fn comment_tree() -> SyntaxArena {
        // // one
        // // two
        // fn f() {}
        // // far
        //
        // // away
        // /* block */
        let mut tree = SyntaxArena::new("source_file", range!(0, 0, 6, 11));
        let root = tree.root();
        tree.add(root, "line_comment", range!(0, 0, 0, 6));
        tree.add(root, "line_comment", range!(1, 0, 1, 6));
        tree.add(root, "function_item", range!(2, 0, 2, 9));
        tree.add(root, "line_comment", range!(3, 0, 3, 6));
        tree.add(root, "line_comment", range!(5, 0, 5, 7));
        tree.add(root, "block_comment", range!(6, 0, 6, 11));
        tree
    }

    fn element_tree() -> SyntaxArena {
        // <div><b>hi</b><br/></div>
        let mut tree = SyntaxArena::new("fragment", range!(0, 0, 0, 25));
        let root = tree.root();
        let div = tree.add(root, "element", range!(0, 0, 0, 25));
        tree.add(div, "start_tag", range!(0, 0, 0, 5));
        let b = tree.add(div, "element", range!(0, 5, 0, 14));
        tree.add(b, "start_tag", range!(0, 5, 0, 8));
        tree.add(b, "text", range!(0, 8, 0, 10));
        tree.add(b, "end_tag", range!(0, 10, 0, 14));
        tree.add(div, "self_closing_tag", range!(0, 14, 0, 19));
        tree.add(div, "end_tag", range!(0, 19, 0, 25));
        tree
    }

    const COMMENTS: &str = "// one\n// two\nfn f() {}\n// far\n\n// away\n/* block */";

    #[test]
    fn test_function() {
        let tree = function_tree();

        assert_motion!(
            MotionSpec::Function,
            "fn main() {\n    let x = []1;\n}\n",
            Some("[fn main() {\n    let x = 1;\n}]\n"),
            &tree
        );
        assert_motion!(MotionSpec::Function, "fn main() {\n    let x = 1;\n}\n[]", None, &tree);
    }

    #[test]
    fn test_comment_coalesces_adjacent_lines() {
        let tree = comment_tree();

        assert_motion!(
            MotionSpec::Comment,
            "// one\n// t[]wo\nfn f() {}\n// far\n\n// away\n/* block */",
            Some("[// one\n// two]\nfn f() {}\n// far\n\n// away\n/* block */"),
            &tree
        );

        // A blank line separates comments.
        assert_motion!(
            MotionSpec::Comment,
            "// one\n// two\nfn f() {}\n// f[]ar\n\n// away\n/* block */",
            Some("// one\n// two\nfn f() {}\n[// far]\n\n// away\n/* block */"),
            &tree
        );

        // Block comments don't join with line comments.
        assert_motion!(
            MotionSpec::Comment,
            "// one\n// two\nfn f() {}\n// far\n\n// away\n/* bl[]ock */",
            Some("// one\n// two\nfn f() {}\n// far\n\n// away\n[/* block */]"),
            &tree
        );

        assert_motion!(MotionSpec::Comment, &COMMENTS.replace("fn f", "fn[] f"), None, &tree);
    }

    #[test]
    fn test_element() {
        let tree = element_tree();
        let ie = MotionSpec::Element(ObjectScope::Inside);
        let ae = MotionSpec::Element(ObjectScope::Around);

        assert_motion!(ie, "<div><b>h[]i</b><br/></div>", Some("<div><b>[hi]</b><br/></div>"), &tree);
        assert_motion!(ae, "<div><b>h[]i</b><br/></div>", Some("<div>[<b>hi</b>]<br/></div>"), &tree);
        assert_motion!(ie, "<d[]iv><b>hi</b><br/></div>", Some("<div>[<b>hi</b><br/>]</div>"), &tree);
        assert_motion!(ie, "<div><b>hi</b><b[]r/></div>", None, &tree);
        assert_motion!(ae, "<div><b>hi</b><b[]r/></div>", Some("<div><b>hi</b>[<br/>]</div>"), &tree);
    }

    #[test]
    fn test_arguments() {
        let tree = call_tree();
        let ia = MotionSpec::PropertyOrParameter(ObjectScope::Inside);
        let aa = MotionSpec::PropertyOrParameter(ObjectScope::Around);

        assert_motion!(ia, "let x = foo([]a, b);", Some("let x = foo([a], b);"), &tree);
        assert_motion!(aa, "let x = foo([]a, b);", Some("let x = foo([a,] b);"), &tree);
        assert_motion!(aa, "let x = foo(a, []b);", Some("let x = foo(a[, b]);"), &tree);
        assert_motion!(ia, "let []x = foo(a, b);", None, &tree);
    }

    #[test]
    fn test_node() {
        let tree = call_tree();

        assert_motion!(MotionSpec::Node, "let x = f[]oo(a, b);", Some("let x = [foo](a, b);"), &tree);
        assert_motion!(MotionSpec::Node, "let x = foo(a,[] b);", Some("let x = foo[(a, b)];"), &tree);
        assert_eq!(tree.kind(tree.root()), "source_file");
    }

    #[test]
    fn test_without_tree() {
        assert_motion!(MotionSpec::Node, "let x = f[]oo(a, b);", None);
        assert_motion!(MotionSpec::Function, "fn main() {[]}", None);
    }
}
