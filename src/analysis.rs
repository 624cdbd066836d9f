// src/analysis.rs
// ---------------------------------------------------------------------------
// Árvore de análise: exploração livre e reprodução de variantes.
// Nós ficam numa arena (Vec); filhos por índice, pai como índice não-dono.
// Nós nunca são removidos: vivem enquanto a árvore viver.
// ---------------------------------------------------------------------------

use log::{debug, trace, warn};
use shakmaty::{Chess, Color, Move, Square};

use crate::{
    audio::{SharedSound, Sound},
    engine::{self, Dests},
};

/// Índice de um nó na arena
pub type NodeId = usize;

/// A raiz é sempre o primeiro nó
pub const ROOT: NodeId = 0;

/// Nó da árvore: posição após `uci`, aplicado à posição do pai
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id:       NodeId,
    pub ply:      u32,             // Meio-lance absoluto (ply do pai + 1)
    pub fen:      String,
    pub uci:      Option<String>,  // None apenas na raiz
    pub san:      Option<String>,
    pub children: Vec<NodeId>,     // Em ordem de inserção; o primeiro é a linha principal
    pub parent:   Option<NodeId>,
    position:     Chess,
}

impl TreeNode {
    pub fn position(&self) -> &Chess { &self.position }

    fn is_capture(&self) -> bool {
        self.san.as_deref().is_some_and(|s| s.contains('x'))
    }
}

pub struct AnalysisTree {
    nodes:       Vec<TreeNode>,
    current:     NodeId,
    root_valid:  bool,
    orientation: Color,
    sound:       SharedSound,
}

impl AnalysisTree {
    /// Constrói a árvore com a linha inicial; o nó atual começa na raiz.
    pub fn new<S: AsRef<str>>(fen: &str, moves: &[S], sound: SharedSound) -> Self {
        let loaded = engine::load_position(fen);
        let root = TreeNode {
            id:       ROOT,
            ply:      engine::ply_of(&loaded.position),
            fen:      engine::to_fen(&loaded.position),
            uci:      None,
            san:      None,
            children: Vec::new(),
            parent:   None,
            position: loaded.position,
        };
        let mut tree = AnalysisTree {
            orientation: engine::side_to_move(&root.position),
            nodes:       vec![root],
            current:     ROOT,
            root_valid:  loaded.valid,
            sound,
        };

        let mut head = ROOT;
        for (i, uci) in moves.iter().enumerate() {
            let uci = uci.as_ref();
            let Some(mv) = engine::parse_uci(&tree.nodes[head].position, uci) else {
                warn!("linha inicial interrompida no lance #{i}: {uci}");
                break;
            };
            head = tree.insert_child(head, &mv);
        }
        debug!("árvore de análise criada com {} nós", tree.nodes.len());
        tree
    }

    /// Filho existente com o mesmo lance ou um novo filho
    fn insert_child(&mut self, parent: NodeId, mv: &Move) -> NodeId {
        let uci = engine::canonical_uci(mv);
        let parent_node = &self.nodes[parent];
        if let Some(&existing) = parent_node
            .children
            .iter()
            .find(|&&c| self.nodes[c].uci.as_deref() == Some(uci.as_str()))
        {
            return existing;
        }

        let san = engine::to_san(&parent_node.position, mv);
        let position = engine::apply_move(&parent_node.position, mv);
        let id = self.nodes.len();
        let node = TreeNode {
            id,
            ply:      parent_node.ply.saturating_add(1),
            fen:      engine::to_fen(&position),
            uci:      Some(uci),
            san:      Some(san),
            children: Vec::new(),
            parent:   Some(parent),
            position,
        };
        self.nodes.push(node);
        self.nodes[parent].children.push(id);
        id
    }

    fn set_current(&mut self, id: NodeId) {
        if id == self.current { return; }
        self.current = id;
        let node = &self.nodes[id];
        if node.uci.is_some() {
            self.sound.play(Sound::for_move(node.is_capture()));
        }
    }

    /// Joga `uci` a partir do nó atual. Reaproveita o filho com o mesmo lance;
    /// lance ilegível ou ilegal não altera nada.
    pub fn apply_move(&mut self, uci: &str) -> Option<NodeId> {
        let Some(mv) = engine::parse_uci(&self.nodes[self.current].position, uci) else {
            trace!("lance ignorado na análise: {uci}");
            return None;
        };
        let id = self.insert_child(self.current, &mv);
        self.set_current(id);
        Some(id)
    }

    /// Volta à raiz e aplica a variante; para no primeiro lance rejeitado.
    pub fn play_variation<S: AsRef<str>>(&mut self, ucis: &[S]) -> NodeId {
        self.reset();
        for uci in ucis {
            if self.apply_move(uci.as_ref()).is_none() {
                warn!("variante interrompida em {}", uci.as_ref());
                break;
            }
        }
        self.current
    }

    pub fn next(&mut self) {
        if let Some(&child) = self.nodes[self.current].children.first() { self.set_current(child); }
    }

    pub fn previous(&mut self) {
        if let Some(parent) = self.nodes[self.current].parent { self.set_current(parent); }
    }

    pub fn reset(&mut self) { self.set_current(ROOT); }

    /// Segue o primeiro filho até uma folha
    pub fn jump_to_end(&mut self) {
        let mut id = self.current;
        while let Some(&child) = self.nodes[id].children.first() { id = child; }
        self.set_current(id);
    }

    /// Reposiciona diretamente; índice inexistente é ignorado
    pub fn jump_to(&mut self, id: NodeId) -> bool {
        if id >= self.nodes.len() { return false; }
        self.set_current(id);
        true
    }

    /// Lances UCI da raiz até o nó
    pub fn path_to(&self, id: NodeId) -> Vec<String> {
        let mut path = Vec::new();
        let mut cursor = self.nodes.get(id);
        while let Some(node) = cursor {
            if let Some(uci) = &node.uci { path.push(uci.clone()); }
            cursor = node.parent.map(|p| &self.nodes[p]);
        }
        path.reverse();
        path
    }

    /// Linha principal (primeiros filhos a partir da raiz)
    pub fn mainline(&self) -> Vec<NodeId> {
        let mut line = Vec::new();
        let mut id = ROOT;
        while let Some(&child) = self.nodes[id].children.first() {
            line.push(child);
            id = child;
        }
        line
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> { self.nodes.get(id) }
    pub fn nodes(&self) -> &[TreeNode] { &self.nodes }

    /// Filhos do nó em ordem de inserção; vazio para índice inexistente
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or_default()
    }

    pub fn root(&self) -> &TreeNode { &self.nodes[ROOT] }
    pub fn current(&self) -> &TreeNode { &self.nodes[self.current] }
    pub fn current_id(&self) -> NodeId { self.current }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.len() == 1 }
    pub fn fen(&self) -> &str { &self.current().fen }
    pub fn is_root_valid(&self) -> bool { self.root_valid }
    pub fn is_check(&self) -> bool { engine::is_check(&self.current().position) }

    pub fn legal_destinations(&self) -> Dests { engine::legal_destinations(&self.current().position) }

    pub fn requires_promotion(&self, from: Square, to: Square) -> bool {
        engine::requires_promotion(&self.current().position, from, to)
    }

    pub fn orientation(&self) -> Color { self.orientation }
    pub fn flip(&mut self) { self.orientation = self.orientation.other(); }
}
