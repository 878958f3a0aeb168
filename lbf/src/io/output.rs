use serde::{Deserialize, Serialize};

use foamcut::io::ext_repr::{ExtNestingInstance, ExtNestingSolution};

use crate::config::LBFConfig;

/// Everything needed to reproduce a run: the instance, the solution and the config that produced it
#[derive(Serialize, Deserialize, Clone)]
pub struct LBFOutput {
    #[serde(flatten)]
    pub instance: ExtNestingInstance,
    pub solution: ExtNestingSolution,
    pub config: LBFConfig,
}
