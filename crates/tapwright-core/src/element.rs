//! Element snapshots and typed element capabilities.
//!
//! The view tree hands the engine a snapshot of its nodes. Each node carries
//! its own visibility flag; an element counts as visible on screen only when
//! it and every ancestor are visible, so traversal prunes hidden subtrees.

use crate::geometry::Rect;

/// Stable identity of a node inside the view tree, assigned by the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub u64);

impl std::fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Plain container.
    Container,
    Text,
    Button,
    TextInput,
    Toast,
    Alert,
    Carousel,
    Image,
}

/// A located element as seen at snapshot time.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub handle: ElementHandle,
    pub kind: ElementKind,
    pub id: Option<String>,
    pub text: Option<String>,
    /// Absolute position and actual size.
    pub bounds: Rect,
}

impl Element {
    pub fn id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn is<T: ViewType>(&self) -> bool {
        T::accepts(self.kind)
    }
}

/// A node of a view tree snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementNode {
    pub element: Element,
    pub visible: bool,
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    pub fn leaf(element: Element, visible: bool) -> Self {
        Self {
            element,
            visible,
            children: Vec::new(),
        }
    }

    /// Elements of type `T` whose whole ancestry chain is visible, in
    /// depth-first document order.
    pub fn visible_of<T: ViewType>(&self) -> Vec<Element> {
        fn collect<T: ViewType>(node: &ElementNode, results: &mut Vec<Element>) {
            if !node.visible {
                return;
            }
            if node.element.is::<T>() {
                results.push(node.element.clone());
            }
            for child in &node.children {
                collect::<T>(child, results);
            }
        }

        let mut results = Vec::new();
        collect::<T>(self, &mut results);
        results
    }

    /// Every element of type `T` regardless of visibility.
    pub fn all_of<T: ViewType>(&self) -> Vec<Element> {
        fn collect<T: ViewType>(node: &ElementNode, results: &mut Vec<Element>) {
            if node.element.is::<T>() {
                results.push(node.element.clone());
            }
            for child in &node.children {
                collect::<T>(child, results);
            }
        }

        let mut results = Vec::new();
        collect::<T>(self, &mut results);
        results
    }
}

/// A typed capability that elements can be queried by.
pub trait ViewType {
    /// Name used in failure messages.
    const NAME: &'static str;

    fn accepts(kind: ElementKind) -> bool;
}

macro_rules! view_type {
    ($(#[$meta:meta])* $name:ident, $label:literal, $($kind:ident)|+) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl ViewType for $name {
            const NAME: &'static str = $label;

            fn accepts(kind: ElementKind) -> bool {
                matches!(kind, $(ElementKind::$kind)|+)
            }
        }
    };
}

view_type!(
    /// Matches every element.
    AnyView,
    "View",
    Container | Text | Button | TextInput | Toast | Alert | Carousel | Image
);
view_type!(
    /// Read-only text and buttons.
    TextView,
    "TextView",
    Text | Button
);
view_type!(
    /// Anything that displays text, including inputs.
    TextControl,
    "TextControl",
    Text | Button | TextInput
);
view_type!(TextInput, "TextInput", TextInput);
view_type!(Button, "Button", Button);
view_type!(Toast, "Toast", Toast);
view_type!(Alert, "Alert", Alert);
view_type!(Carousel, "Carousel", Carousel);
