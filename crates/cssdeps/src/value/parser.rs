use super::{NodeId, ValueKind, ValueNode, ValueTree};

struct Frame {
    id: NodeId,
    children: Vec<NodeId>,
    after: String,
}

pub(super) struct ValueParser<'a> {
    input: &'a str,
    pos: usize,
    tree: ValueTree,
    stack: Vec<Frame>,
    /// Whitespace seen right before a divider, waiting for the divider node.
    pending_before: String,
}

fn is_space(byte: u8) -> bool {
    byte <= b' '
}

fn ends_word(byte: u8) -> bool {
    is_space(byte) || matches!(byte, b'\'' | b'"' | b',' | b':' | b'/' | b'(' | b')')
}

fn is_unicode_range(word: &str) -> bool {
    let bytes = word.as_bytes();
    bytes.len() > 2
        && matches!(bytes[0], b'u' | b'U')
        && bytes[1] == b'+'
        && bytes[2..].iter().all(|b| b.is_ascii_hexdigit() || *b == b'?' || *b == b'-')
}

impl<'a> ValueParser<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            tree: ValueTree::default(),
            stack: Vec::new(),
            pending_before: String::new(),
        }
    }

    pub(super) fn parse(mut self) -> ValueTree {
        while let Some(byte) = self.peek() {
            match byte {
                b if is_space(b) => self.whitespace(),
                b'\'' | b'"' => self.string(byte),
                b'/' if self.peek_at(1) == Some(b'*') => self.comment(),
                b'/' if self.in_calc() => self.single_word(),
                b',' | b':' | b'/' => self.div(),
                b'(' => {
                    self.pos += 1;
                    self.open_function(String::new());
                },
                b')' => self.close_function(),
                _ => self.word(),
            }
        }
        self.finish()
    }

    fn peek(&self) -> Option<u8> {
        self.peek_at(0)
    }

    fn peek_at(
        &self,
        offset: usize,
    ) -> Option<u8> {
        self.input.as_bytes().get(self.pos + offset).copied()
    }

    fn in_calc(&self) -> bool {
        self.stack.last().is_some_and(|frame| self.tree.node(frame.id).value.eq_ignore_ascii_case("calc"))
    }

    fn siblings(&mut self) -> &mut Vec<NodeId> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.children,
            None => &mut self.tree.roots,
        }
    }

    fn emit(
        &mut self,
        node: ValueNode,
    ) -> NodeId {
        let id = self.tree.push(node);
        self.siblings().push(id);
        id
    }

    fn whitespace(&mut self) {
        let start = self.pos;
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
        let text = self.input[start..self.pos].to_string();
        let next = self.peek();

        if next == Some(b')')
            && let Some(frame) = self.stack.last_mut()
        {
            frame.after = text;
            return;
        }

        let last = self.siblings().last().copied();
        if let Some(last) = last
            && let ValueKind::Div {
                after,
                ..
            } = &mut self.tree.nodes[last.0].kind
        {
            after.push_str(&text);
            return;
        }

        let divides = match next {
            Some(b',' | b':') => true,
            Some(b'/') => self.peek_at(1) != Some(b'*') && !self.in_calc(),
            _ => false,
        };
        if divides {
            self.pending_before = text;
            return;
        }

        self.emit(ValueNode::leaf(ValueKind::Space, text));
    }

    fn string(
        &mut self,
        quote: u8,
    ) {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.pos + 1;
        let mut pos = start;
        let close = loop {
            match bytes.get(pos) {
                None => break None,
                Some(b'\\') => pos += 2,
                Some(&b) if b == quote => break Some(pos),
                Some(_) => pos += 1,
            }
        };
        let end = close.unwrap_or(bytes.len()).min(bytes.len());
        let value = input[start..end].to_string();
        self.pos = close.map_or(bytes.len(), |close| close + 1);
        self.emit(ValueNode::leaf(
            ValueKind::String {
                quote: quote as char,
                unclosed: close.is_none(),
            },
            value,
        ));
    }

    fn comment(&mut self) {
        let input = self.input;
        let start = self.pos + 2;
        let (value, unclosed) = match input[start..].find("*/") {
            Some(offset) => {
                self.pos = start + offset + 2;
                (&input[start..start + offset], false)
            },
            None => {
                self.pos = input.len();
                (&input[start..], true)
            },
        };
        self.emit(ValueNode::leaf(
            ValueKind::Comment {
                unclosed,
            },
            value,
        ));
    }

    fn div(&mut self) {
        let input = self.input;
        let value = &input[self.pos..self.pos + 1];
        self.pos += 1;
        let before = std::mem::take(&mut self.pending_before);
        self.emit(ValueNode::leaf(
            ValueKind::Div {
                before,
                after: String::new(),
            },
            value,
        ));
    }

    fn single_word(&mut self) {
        let input = self.input;
        let value = &input[self.pos..self.pos + 1];
        self.pos += 1;
        self.emit(ValueNode::leaf(ValueKind::Word, value));
    }

    fn word(&mut self) {
        let input = self.input;
        let start = self.pos;
        let mut end = input.len();
        let mut chars = input[start..].char_indices();
        while let Some((offset, ch)) = chars.next() {
            if ch == '\\' {
                chars.next();
                continue;
            }
            if ch.is_ascii() && ends_word(ch as u8) {
                end = start + offset;
                break;
            }
        }
        let word = &input[start..end];
        self.pos = end;

        if self.peek() == Some(b'(') {
            self.pos += 1;
            self.open_function(word.to_string());
        } else if is_unicode_range(word) {
            self.emit(ValueNode::leaf(ValueKind::UnicodeRange, word));
        } else {
            self.emit(ValueNode::leaf(ValueKind::Word, word));
        }
    }

    fn open_function(
        &mut self,
        name: String,
    ) {
        let ws_start = self.pos;
        while self.peek().is_some_and(is_space) {
            self.pos += 1;
        }
        let before = self.input[ws_start..self.pos].to_string();
        let unquoted_url = name.eq_ignore_ascii_case("url") && !matches!(self.peek(), Some(b'\'' | b'"'));

        let id = self.emit(ValueNode::leaf(
            ValueKind::Function {
                before,
                after: String::new(),
                unclosed: false,
            },
            name,
        ));

        if unquoted_url {
            self.url_body(id);
        } else {
            self.stack.push(Frame {
                id,
                children: Vec::new(),
                after: String::new(),
            });
        }
    }

    /// The argument of an unquoted `url(` is kept whole, up to the first
    /// unescaped `)`.
    fn url_body(
        &mut self,
        id: NodeId,
    ) {
        let input = self.input;
        let bytes = input.as_bytes();
        let start = self.pos;
        let mut pos = start;
        let close = loop {
            match bytes.get(pos) {
                None => break None,
                Some(b'\\') => pos += 2,
                Some(b')') => break Some(pos),
                Some(_) => pos += 1,
            }
        };
        let end = close.unwrap_or(bytes.len()).min(bytes.len());
        let content = &input[start..end];
        let word = content.trim_end_matches(|c: char| c <= ' ');
        let trailing = &content[word.len()..];

        let mut children = Vec::new();
        if !word.is_empty() {
            children.push(self.tree.push(ValueNode::leaf(ValueKind::Word, word)));
        }
        let unclosed = close.is_none();
        let after = if unclosed && !trailing.is_empty() {
            children.push(self.tree.push(ValueNode::leaf(ValueKind::Space, trailing)));
            String::new()
        } else {
            trailing.to_string()
        };
        self.pos = close.map_or(bytes.len(), |close| close + 1);

        let node = &mut self.tree.nodes[id.0];
        node.children = children;
        if let ValueKind::Function {
            after: node_after,
            unclosed: node_unclosed,
            ..
        } = &mut node.kind
        {
            *node_after = after;
            *node_unclosed = unclosed;
        }
    }

    fn close_function(&mut self) {
        let Some(frame) = self.stack.pop() else {
            self.single_word();
            return;
        };
        self.pos += 1;
        self.seal(frame, false);
    }

    fn seal(
        &mut self,
        frame: Frame,
        is_unclosed: bool,
    ) {
        let node = &mut self.tree.nodes[frame.id.0];
        node.children = frame.children;
        if let ValueKind::Function {
            after,
            unclosed,
            ..
        } = &mut node.kind
        {
            *after = frame.after;
            *unclosed = is_unclosed;
        }
    }

    fn finish(mut self) -> ValueTree {
        while let Some(frame) = self.stack.pop() {
            self.seal(frame, true);
        }
        self.tree
    }
}
