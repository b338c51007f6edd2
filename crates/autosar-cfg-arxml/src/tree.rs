// crates/autosar-cfg-arxml/src/tree.rs

//! Owned element tree used for every ARXML document.
//!
//! Each `Element` owns its children; there are no parent links and no shared
//! nodes. Moving a subtree from one document to another is a plain move of
//! the `Element` value (see [`Element::take_descendants`]).
//!
//! ARXML carries no mixed content, so an element keeps a single text value
//! (all of its character data, concatenated and trimmed) next to its child
//! elements.

use core::slice;

/// An attribute in document order. `name` is the qualified name as written,
/// e.g. `xmlns:xsi` or `xsi:schemaLocation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) namespace: Option<String>,
    pub(crate) attributes: Vec<Attribute>,
    pub(crate) text: Option<String>,
    pub(crate) children: Vec<Element>,
}

impl Element {
    /// Creates an empty element. Elements built in code carry no resolved
    /// namespace; they inherit the document's default namespace on output.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.text = Some(text.into());
        element
    }

    // --- Names ---

    /// Qualified name as written (`AR-PACKAGE`, `ar:AR-PACKAGE`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(prefix, _)| prefix)
    }

    /// Namespace URI resolved by the reader, `None` for unbound elements.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// `true` if the local name matches and the element is bound to `namespace`
    /// (`None` matches unbound elements only).
    pub fn is(&self, local_name: &str, namespace: Option<&str>) -> bool {
        self.local_name() == local_name && self.namespace() == namespace
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_namespace(&mut self, namespace: Option<String>) {
        self.namespace = namespace;
    }

    // --- Attributes ---

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute, replacing an existing value in place so the
    /// attribute order stays stable.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    // --- Text ---

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Text of the direct `SHORT-NAME` child, if any.
    pub fn short_name(&self) -> Option<&str> {
        self.child("SHORT-NAME").and_then(Element::text)
    }

    // --- Children ---

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Appends `child` and returns a reference to it in its new place.
    pub fn push_child(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn add_child(&mut self, name: impl Into<String>) -> &mut Element {
        self.push_child(Element::new(name))
    }

    pub fn add_text_child(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> &mut Element {
        self.push_child(Element::with_text(name, text))
    }

    /// First direct child with the given local name.
    pub fn child(&self, local_name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == local_name)
    }

    pub fn child_mut(&mut self, local_name: &str) -> Option<&mut Element> {
        self.children
            .iter_mut()
            .find(|c| c.local_name() == local_name)
    }

    pub fn children_named<'a>(&'a self, local_name: &str) -> impl Iterator<Item = &'a Element> {
        self.children
            .iter()
            .filter(move |c| c.local_name() == local_name)
    }

    /// Returns the first direct child matching `predicate`, appending the
    /// element built by `make` when there is none.
    pub fn find_or_insert_child<P, F>(&mut self, predicate: P, make: F) -> &mut Element
    where
        P: Fn(&Element) -> bool,
        F: FnOnce() -> Element,
    {
        let index = match self.children.iter().position(|c| predicate(c)) {
            Some(index) => index,
            None => {
                self.children.push(make());
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    // --- Subtree ---

    /// Depth-first, document-order iterator over every element below `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    pub fn descendants_named<'a>(&'a self, local_name: &str) -> impl Iterator<Item = &'a Element> {
        self.descendants()
            .filter(move |e| e.local_name() == local_name)
    }

    /// Number of elements below `self`, at any depth.
    pub fn descendant_count(&self) -> usize {
        self.descendants().count()
    }

    /// `xmlns:<prefix>` declarations on `self`, as `(prefix, uri)` pairs.
    pub fn prefix_declarations(&self) -> Vec<(String, String)> {
        self.attributes
            .iter()
            .filter_map(|a| {
                a.name
                    .strip_prefix("xmlns:")
                    .map(|prefix| (prefix.to_string(), a.value.clone()))
            })
            .collect()
    }

    /// Detaches every outermost descendant matching `predicate` and returns
    /// them in document order. Matches nested inside a detached element stay
    /// inside it.
    ///
    /// Each detached element comes with the prefix declarations of its former
    /// ancestors (`self` included), outermost first.
    pub fn take_descendants<P: FnMut(&Element) -> bool>(&mut self, mut predicate: P) -> Vec<Detached> {
        let mut scope = self.prefix_declarations();
        let mut taken = Vec::new();
        self.take_into(&mut predicate, &mut scope, &mut taken);
        taken
    }

    fn take_into<P: FnMut(&Element) -> bool>(
        &mut self,
        predicate: &mut P,
        scope: &mut Vec<(String, String)>,
        taken: &mut Vec<Detached>,
    ) {
        let children = core::mem::take(&mut self.children);
        for mut child in children {
            if predicate(&child) {
                taken.push(Detached {
                    element: child,
                    scope: scope.clone(),
                });
            } else {
                let depth = scope.len();
                scope.extend(child.prefix_declarations());
                child.take_into(predicate, scope, taken);
                scope.truncate(depth);
                self.children.push(child);
            }
        }
    }
}

/// An element detached by [`Element::take_descendants`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detached {
    pub element: Element,
    /// Prefix declarations that were in scope at the old position. Later
    /// entries shadow earlier ones with the same prefix.
    pub scope: Vec<(String, String)>,
}

/// Iterator returned by [`Element::descendants`].
pub struct Descendants<'a> {
    stack: Vec<slice::Iter<'a, Element>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let level = self.stack.last_mut()?;
            match level.next() {
                Some(element) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}
