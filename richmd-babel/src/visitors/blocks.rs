//! Block and structural visitors.

use super::{is_kind, unexpected_ast, unexpected_editor};
use crate::ast;
use crate::common::export::ExportContext;
use crate::common::import::ImportScope;
use crate::editor::{EditorNodeKind, EditorTree, HeadingTag, ListType, NodeData, NodeKey};
use crate::error::ConvertError;
use crate::registry::Visitor;

pub struct RootVisitor;

impl Visitor for RootVisitor {
    fn name(&self) -> &str {
        "root"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::Root(_))
    }

    // The AST root maps onto whatever editor node the import targets.
    fn import(
        &self,
        _node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        scope.set_current_as_parent_to(parent);
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::Root)
    }

    fn export(
        &self,
        key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let root = ctx.append_to_parent(siblings, ast::Node::root(vec![]));
        ctx.traverse_children(key, root)
    }
}

pub struct ParagraphVisitor;

impl Visitor for ParagraphVisitor {
    fn name(&self) -> &str {
        "paragraph"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::Paragraph(_))
    }

    /// Quotes and list items hold their text directly, so a paragraph inside one is collapsed
    /// into it. A collapsed paragraph that follows earlier content starts on a new line.
    fn import(
        &self,
        _node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let tree = scope.tree();
        let collapses = is_kind(tree, parent, EditorNodeKind::Quote)
            || is_kind(tree, parent, EditorNodeKind::ListItem);

        if collapses {
            if !tree.children(parent).is_empty() {
                scope.append(parent, NodeData::LineBreak)?;
            }
            scope.set_current_as_parent_to(parent);
        } else {
            let paragraph = scope.append(parent, NodeData::Paragraph)?;
            scope.set_current_as_parent_to(paragraph);
        }
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::Paragraph)
    }

    fn export(
        &self,
        key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let paragraph = ctx.append_to_parent(siblings, ast::Node::paragraph(vec![]));
        ctx.traverse_children(key, paragraph)
    }
}

pub struct LinkVisitor;

impl Visitor for LinkVisitor {
    fn name(&self) -> &str {
        "link"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::Link(_))
    }

    fn import(
        &self,
        node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let ast::Node::Link(link) = node else {
            return Err(unexpected_ast(node));
        };
        let key = scope.append(
            parent,
            NodeData::Link {
                url: link.url.clone(),
                title: link.title.clone(),
            },
        )?;
        scope.set_current_as_parent_to(key);
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::Link)
    }

    fn export(
        &self,
        key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let NodeData::Link { url, title } = ctx.tree().data(key)? else {
            return Err(unexpected_editor(ctx.tree(), key));
        };
        let link = ctx.append_to_parent(
            siblings,
            ast::Node::link(url.clone(), title.clone(), vec![]),
        );
        ctx.traverse_children(key, link)
    }
}

pub struct HeadingVisitor;

impl Visitor for HeadingVisitor {
    fn name(&self) -> &str {
        "heading"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::Heading(_))
    }

    fn import(
        &self,
        node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let ast::Node::Heading(heading) = node else {
            return Err(unexpected_ast(node));
        };
        let key = scope.append(
            parent,
            NodeData::heading(HeadingTag::from_depth(heading.depth)),
        )?;
        scope.set_current_as_parent_to(key);
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::Heading)
    }

    fn export(
        &self,
        key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let NodeData::Heading { tag } = ctx.tree().data(key)? else {
            return Err(unexpected_editor(ctx.tree(), key));
        };
        let heading = ctx.append_to_parent(siblings, ast::Node::heading(tag.depth(), vec![]));
        ctx.traverse_children(key, heading)
    }
}

pub struct ListVisitor;

impl Visitor for ListVisitor {
    fn name(&self) -> &str {
        "list"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::List(_))
    }

    /// A list nested in a list item moves into a dedicated item right after it.
    fn import(
        &self,
        node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let ast::Node::List(list) = node else {
            return Err(unexpected_ast(node));
        };
        let data = NodeData::List {
            list_type: if list.ordered {
                ListType::Number
            } else {
                ListType::Bullet
            },
            start: list.start.unwrap_or(1),
        };

        let parent = if is_kind(scope.tree(), parent, EditorNodeKind::ListItem) {
            scope.dedicated_item_for(parent)?
        } else {
            parent
        };
        let key = scope.append(parent, data)?;
        scope.set_current_as_parent_to(key);
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::List)
    }

    fn export(
        &self,
        key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let NodeData::List { list_type, start } = ctx.tree().data(key)? else {
            return Err(unexpected_editor(ctx.tree(), key));
        };
        let ordered = *list_type == ListType::Number;
        let list = ctx.append_to_parent(
            siblings,
            ast::Node::List(ast::List {
                ordered,
                start: ordered.then_some(*start),
                spread: false,
                children: vec![],
            }),
        );
        ctx.traverse_children(key, list)
    }
}

pub struct ListItemVisitor;

impl Visitor for ListItemVisitor {
    fn name(&self) -> &str {
        "listItem"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::ListItem(_))
    }

    fn import(
        &self,
        _node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let key = scope.append(parent, NodeData::ListItem)?;
        scope.set_current_as_parent_to(key);
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::ListItem)
    }

    /// An item that only holds a nested list is folded into the previous item. Any other item
    /// gets an inner paragraph that receives its content.
    fn export(
        &self,
        key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let tree = ctx.tree();
        let nested_only = matches!(
            tree.children(key),
            [only] if is_kind(tree, *only, EditorNodeKind::List)
        );

        if nested_only {
            return match siblings.last_mut() {
                Some(prev) if matches!(prev, ast::Node::ListItem(_)) => {
                    ctx.traverse_children(key, prev)
                }
                _ => Err(ConvertError::OrphanNestedList(key)),
            };
        }

        let mut paragraph = ast::Node::paragraph(vec![]);
        ctx.traverse_children(key, &mut paragraph)?;
        ctx.append_to_parent(siblings, ast::Node::list_item(vec![paragraph]));
        Ok(())
    }
}

pub struct BlockquoteVisitor;

impl Visitor for BlockquoteVisitor {
    fn name(&self) -> &str {
        "blockquote"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::Blockquote(_))
    }

    fn import(
        &self,
        _node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let key = scope.append(parent, NodeData::Quote)?;
        scope.set_current_as_parent_to(key);
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::Quote)
    }

    fn export(
        &self,
        key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let mut paragraph = ast::Node::paragraph(vec![]);
        ctx.traverse_children(key, &mut paragraph)?;
        ctx.append_to_parent(siblings, ast::Node::blockquote(vec![paragraph]));
        Ok(())
    }
}

pub struct CodeVisitor;

impl Visitor for CodeVisitor {
    fn name(&self) -> &str {
        "code"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::Code(_))
    }

    fn import(
        &self,
        node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let ast::Node::Code(code) = node else {
            return Err(unexpected_ast(node));
        };
        let key = scope.append(parent, NodeData::code(code.lang.clone()))?;
        if !code.value.is_empty() {
            scope.append(key, NodeData::text(code.value.clone()))?;
        }
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::Code)
    }

    // Contents are flattened to a string; the children are not traversed.
    fn export(
        &self,
        key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let tree = ctx.tree();
        let NodeData::Code { language } = tree.data(key)? else {
            return Err(unexpected_editor(tree, key));
        };
        ctx.append_to_parent(
            siblings,
            ast::Node::code(language.clone(), tree.text_content(key)),
        );
        Ok(())
    }
}

pub struct ThematicBreakVisitor;

impl Visitor for ThematicBreakVisitor {
    fn name(&self) -> &str {
        "thematicBreak"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::ThematicBreak)
    }

    fn import(
        &self,
        _node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        scope.append(parent, NodeData::HorizontalRule)?;
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::HorizontalRule)
    }

    fn export(
        &self,
        _key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        ctx.append_to_parent(siblings, ast::Node::ThematicBreak);
        Ok(())
    }
}

pub struct ImageVisitor;

impl Visitor for ImageVisitor {
    fn name(&self) -> &str {
        "image"
    }

    fn matches_ast(&self, node: &ast::Node) -> bool {
        matches!(node, ast::Node::Image(_))
    }

    fn import(
        &self,
        node: &ast::Node,
        parent: NodeKey,
        scope: &mut ImportScope<'_>,
    ) -> Result<(), ConvertError> {
        let ast::Node::Image(image) = node else {
            return Err(unexpected_ast(node));
        };
        scope.append(
            parent,
            NodeData::image(image.url.clone(), image.alt.clone(), image.title.clone()),
        )?;
        Ok(())
    }

    fn matches_editor(&self, tree: &EditorTree, key: NodeKey) -> bool {
        is_kind(tree, key, EditorNodeKind::Image)
    }

    fn export(
        &self,
        key: NodeKey,
        siblings: &mut Vec<ast::Node>,
        ctx: &ExportContext<'_>,
    ) -> Result<(), ConvertError> {
        let NodeData::Image {
            src,
            alt_text,
            title,
        } = ctx.tree().data(key)?
        else {
            return Err(unexpected_editor(ctx.tree(), key));
        };
        ctx.append_to_parent(
            siblings,
            ast::Node::image(src.clone(), alt_text.clone(), title.clone()),
        );
        Ok(())
    }
}
