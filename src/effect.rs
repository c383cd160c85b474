/// One selectable effect. `payload` is whatever the mount callback needs; the
/// switcher never looks inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectDescriptor<P> {
    pub key: String,
    pub name: String,
    pub description: Option<String>,
    pub payload: P,
}

impl<P> EffectDescriptor<P> {
    pub fn new(key: impl Into<String>, name: impl Into<String>, payload: P) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: None,
            payload,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
