pub use anyhow::{bail, ensure, format_err, Context as _, Error, Result};
pub use derivative::Derivative;
pub use futures::stream::{self, BoxStream, StreamExt as _, TryStreamExt as _};
pub use indexmap::IndexSet;
pub use itertools::{izip, Itertools as _};
pub use log::{info, warn};
pub use par_stream::prelude::*;
pub use rand::{prelude::*, rngs::StdRng};
pub use serde::{Deserialize, Serialize};
pub use std::{
    fmt::Debug,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{
        atomic::{self, AtomicU64},
        Arc,
    },
};
pub use tch::{Device, Kind, Tensor};
pub use tch_tensor_like::TensorLike;

pub type Fallible<T> = Result<T, Error>;
