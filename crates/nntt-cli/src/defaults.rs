//! Default parameters of the training template.
//!
//! These are the parameters every experiment document is merged against.
//! Projects built on the template extend this list with their own model and
//! data parameters.

use nntt_config::ConfigStore;

/// Group holding optimiser hyper-parameters.
pub const TRAIN_GROUP: &str = "train";

/// Registers the template's default parameters on `store`.
pub fn register_training_defaults(store: &mut ConfigStore) {
    store.register_parameter("name", "test_project", None);
    store.register_parameter("version", "v0.1", None);
    store.register_parameter("lr", 0.01, Some(TRAIN_GROUP));
    store.register_parameter("momentum", 0.1, Some(TRAIN_GROUP));
}

#[cfg(test)]
mod tests {
    use super::*;
    use nntt_config::ParamValue;

    #[test]
    fn test_training_defaults_include_train_group() {
        // Arrange
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = ConfigStore::new(dir.path()).unwrap();

        // Act
        register_training_defaults(&mut store);

        // Assert
        let train = store.defaults().get(TRAIN_GROUP).expect("train group");
        assert_eq!(train["lr"], ParamValue::Float(0.01));
        assert_eq!(train["momentum"], ParamValue::Float(0.1));
        assert_eq!(store.defaults().get("name"), Some(&ParamValue::from("test_project")));
    }
}
