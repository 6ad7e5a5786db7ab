use std::path::PathBuf;

use k8s_openapi::api::networking::v1::Ingress;
use kube::{
    api::ListParams,
    config::{KubeConfigOptions, Kubeconfig, KubeconfigError, NamedContext},
    Api, Client, Config,
};

use crate::{error::Error, logger};

/// Which namespaces ingresses are listed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    All,
    Namespace(String),
    /// The namespace of the selected kubeconfig context
    Context,
}

#[derive(Clone)]
pub struct KubeClient {
    client: Client,
    default_namespace: String,
}

impl KubeClient {
    pub async fn try_new(
        kubeconfig: Option<PathBuf>,
        context: Option<String>,
    ) -> Result<Self, Error> {
        let kubeconfig = read_kubeconfig(kubeconfig)?;

        let context = read_context(&kubeconfig, context)?;

        logger!(info, "using context {}", context.name);

        let options = KubeConfigOptions {
            context: Some(context.name.to_string()),
            ..Default::default()
        };

        let config = Config::from_custom_kubeconfig(kubeconfig, &options).await?;

        let default_namespace = config.default_namespace.clone();

        let client = Client::try_from(config)?;

        Ok(Self {
            client,
            default_namespace,
        })
    }

    pub fn default_namespace(&self) -> &str {
        &self.default_namespace
    }

    pub async fn list_ingresses(&self, scope: &NamespaceScope) -> Result<Vec<Ingress>, Error> {
        let api: Api<Ingress> = match scope {
            NamespaceScope::All => Api::all(self.client.clone()),
            NamespaceScope::Namespace(ns) => Api::namespaced(self.client.clone(), ns),
            NamespaceScope::Context => {
                Api::namespaced(self.client.clone(), &self.default_namespace)
            }
        };

        let list = api.list(&ListParams::default()).await?;

        logger!(info, "listed {} ingresses ({:?})", list.items.len(), scope);

        Ok(list.items)
    }
}

pub fn read_kubeconfig(path: Option<PathBuf>) -> Result<Kubeconfig, KubeconfigError> {
    if let Some(path) = path {
        Kubeconfig::read_from(path)
    } else {
        Kubeconfig::read()
    }
}

/// Resolves the requested context, else the current context, else the first one.
pub fn read_context(
    kubeconfig: &Kubeconfig,
    context: Option<String>,
) -> Result<NamedContext, Error> {
    let find = |name: &str| {
        kubeconfig
            .contexts
            .iter()
            .find(|ctx| ctx.name == name)
            .cloned()
            .ok_or_else(|| Error::Raw(format!("Cannot find context {}", name)))
    };

    if let Some(context) = context {
        find(&context)
    } else if let Some(current_context) = &kubeconfig.current_context {
        find(current_context)
    } else {
        kubeconfig
            .contexts
            .first()
            .cloned()
            .ok_or_else(|| Error::Raw("Empty contexts".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    const KUBECONFIG: &str = indoc! {
        "
        apiVersion: v1
        kind: Config
        current-context: kind
        clusters:
          - name: kind
            cluster:
              server: https://127.0.0.1:6443
        contexts:
          - name: minikube
            context:
              cluster: kind
              user: admin
          - name: kind
            context:
              cluster: kind
              user: admin
              namespace: apps
        users:
          - name: admin
            user:
              token: token
        "
    };

    fn kubeconfig() -> Kubeconfig {
        Kubeconfig::from_yaml(KUBECONFIG).unwrap()
    }

    #[test]
    fn explicit_context() {
        let context = read_context(&kubeconfig(), Some("minikube".into())).unwrap();

        assert_eq!(context.name, "minikube");
    }

    #[test]
    fn current_context() {
        let context = read_context(&kubeconfig(), None).unwrap();

        assert_eq!(context.name, "kind");
    }

    #[test]
    fn first_context_without_current() {
        let mut kubeconfig = kubeconfig();
        kubeconfig.current_context = None;

        let context = read_context(&kubeconfig, None).unwrap();

        assert_eq!(context.name, "minikube");
    }

    #[test]
    fn unknown_context() {
        let err = read_context(&kubeconfig(), Some("prod".into())).unwrap_err();

        assert_eq!(err.to_string(), "Cannot find context prod");
    }
}
