#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    /// A bare node with no operator semantics.
    Generic,
    Conv,
    Relu,
    MaxPool,
    Concat,
    Load(MemAccess),
    Store(MemAccess),
    Malloc(MemAccess),
    Free(MemAccess),
    Tensor(TensorDesc),
}

/// Payload of the memory-access operators.
///
/// `tensor_id` refers to a tensor by convention only. Nothing checks that such a
/// tensor exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MemAccess {
    pub tensor_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct TensorDesc {
    pub name: String,
    pub size: i64,
}

impl MemAccess {
    pub fn new(tensor_id: i64) -> Self {
        Self { tensor_id }
    }
}

impl TensorDesc {
    pub fn new(name: impl Into<String>, size: i64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }
}

impl Op {
    pub fn load(tensor_id: i64) -> Self {
        Op::Load(MemAccess::new(tensor_id))
    }

    pub fn store(tensor_id: i64) -> Self {
        Op::Store(MemAccess::new(tensor_id))
    }

    pub fn malloc(tensor_id: i64) -> Self {
        Op::Malloc(MemAccess::new(tensor_id))
    }

    pub fn free(tensor_id: i64) -> Self {
        Op::Free(MemAccess::new(tensor_id))
    }

    pub fn tensor(desc: TensorDesc) -> Self {
        Op::Tensor(desc)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Op::Generic => "Node",
            Op::Conv => "Conv",
            Op::Relu => "Relu",
            Op::MaxPool => "Maxpool",
            Op::Concat => "Concat",
            Op::Load(_) => "Load",
            Op::Store(_) => "Store",
            Op::Malloc(_) => "Malloc",
            Op::Free(_) => "Free",
            Op::Tensor(_) => "Tensor",
        }
    }

    pub fn mem_access(&self) -> Option<&MemAccess> {
        match self {
            Op::Load(m) | Op::Store(m) | Op::Malloc(m) | Op::Free(m) => Some(m),
            Op::Generic | Op::Conv | Op::Relu | Op::MaxPool | Op::Concat | Op::Tensor(_) => None,
        }
    }

    pub fn is_mem_access(&self) -> bool {
        self.mem_access().is_some()
    }

    pub fn tensor_id(&self) -> Option<i64> {
        self.mem_access().map(|m| m.tensor_id)
    }

    pub fn tensor_desc(&self) -> Option<&TensorDesc> {
        match self {
            Op::Tensor(t) => Some(t),
            _ => None,
        }
    }
}

#[test]
fn op_names() {
    assert_eq!(Op::Generic.name(), "Node");
    assert_eq!(Op::Conv.name(), "Conv");
    assert_eq!(Op::Relu.name(), "Relu");
    assert_eq!(Op::MaxPool.name(), "Maxpool");
    assert_eq!(Op::Concat.name(), "Concat");
    assert_eq!(Op::load(0).name(), "Load");
    assert_eq!(Op::store(0).name(), "Store");
    assert_eq!(Op::malloc(0).name(), "Malloc");
    assert_eq!(Op::free(0).name(), "Free");
    assert_eq!(Op::tensor(TensorDesc::default()).name(), "Tensor");
}

#[test]
fn mem_access_payload() {
    assert_eq!(Op::load(7).tensor_id(), Some(7));
    assert_eq!(Op::free(-3).tensor_id(), Some(-3));
    assert!(Op::malloc(i64::MAX).is_mem_access());
    assert_eq!(Op::Conv.tensor_id(), None);
    assert!(!Op::tensor(TensorDesc::default()).is_mem_access());
}

#[test]
fn tensor_desc_defaults() {
    let t = TensorDesc::default();
    assert_eq!(t.name, "");
    assert_eq!(t.size, 0);

    let t = TensorDesc::default().with_name("weights").with_size(-16);
    assert_eq!(t, TensorDesc::new("weights", -16));
    assert_eq!(Op::tensor(t.clone()).tensor_desc(), Some(&t));
    assert_eq!(Op::Relu.tensor_desc(), None);
}
