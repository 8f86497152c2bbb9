// ABOUTME: Static deployment target table for the two Vnollx services.
// ABOUTME: Immutable registry, injected into the pipeline at construction.

use nonempty::NonEmpty;

/// One deployable unit: where it builds locally and how it runs remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployTarget {
    /// Menu identifier, from a small closed set.
    pub id: &'static str,
    pub display_name: &'static str,
    /// Build-context directory on the workstation.
    pub build_path: &'static str,
    /// Local image name, also the repository name under the registry user.
    pub image: &'static str,
    /// Container name on the remote host.
    pub container: &'static str,
    /// Host:container port binding.
    pub ports: &'static str,
    pub network: &'static str,
}

/// Read-only lookup from target identifier to its deployment record.
///
/// Populated from fixed data at process start; an identifier outside the
/// closed set is an operator input error, surfaced by the caller.
#[derive(Debug, Clone)]
pub struct TargetRegistry {
    targets: NonEmpty<DeployTarget>,
}

impl TargetRegistry {
    /// The built-in backend/frontend table.
    pub fn builtin() -> Self {
        let mut targets = NonEmpty::new(DeployTarget {
            id: "1",
            display_name: "backend (vnollx)",
            build_path: r"D:\IdeaProgram\VnollxOnlineJudge",
            image: "vnollx",
            container: "vnollx",
            ports: "8080:8080",
            network: "app-network",
        });
        targets.push(DeployTarget {
            id: "2",
            display_name: "frontend (vnollx-web)",
            build_path: r"D:\IdeaProgram\VnollxOnlineJudge\frontend",
            image: "vnollx-web",
            container: "vnollx-web",
            ports: "3000:3000",
            network: "app-network",
        });
        Self { targets }
    }

    pub fn get(&self, id: &str) -> Option<&DeployTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeployTarget> {
        self.targets.iter()
    }
}
