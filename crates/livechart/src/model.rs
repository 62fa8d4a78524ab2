//! User models and their mapping onto chart coordinates.

use std::sync::Arc;

use crate::PointIdentityStrategy;

/// The numeric values of one chart point.
///
/// For cartesian series `secondary` is X and `primary` is Y. Financial
/// points store high in `primary` and low in `quinary`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinate {
    pub primary: f64,
    pub secondary: f64,
    pub tertiary: f64,
    pub quaternary: f64,
    pub quinary: f64,
    pub is_null: bool,
}

impl Coordinate {
    /// A cartesian coordinate.
    pub const fn xy(x: f64, y: f64) -> Self {
        Self {
            primary: y,
            secondary: x,
            tertiary: 0.0,
            quaternary: 0.0,
            quinary: 0.0,
            is_null: false,
        }
    }

    /// A gap in the data at category `x`.
    pub const fn null_at(x: f64) -> Self {
        Self {
            is_null: true,
            ..Self::xy(x, 0.0)
        }
    }

    pub const fn with_tertiary(mut self, tertiary: f64) -> Self {
        self.tertiary = tertiary;
        self
    }

    /// A financial coordinate; `primary` is the high and `quinary` the low.
    pub const fn financial(x: f64, high: f64, open: f64, close: f64, low: f64) -> Self {
        Self {
            primary: high,
            secondary: x,
            tertiary: open,
            quaternary: close,
            quinary: low,
            is_null: false,
        }
    }
}

/// Maps a model at an index to its coordinate, overriding
/// [`ChartModel::coordinate`].
pub type Mapping<M> = Arc<dyn Fn(&M, usize) -> Coordinate + Send + Sync>;

/// A value a series can plot.
///
/// The identity strategy is fixed per model type. Plain values are keyed by
/// their position in the series; shared pointers are keyed by the address
/// they point to, so a point follows its model when the collection is
/// reordered.
///
/// # Example
///
/// ```
/// use livechart::{ChartModel, Coordinate};
///
/// #[derive(Clone)]
/// struct Sale {
///     month: u32,
///     total: f64,
/// }
///
/// impl ChartModel for Sale {
///     fn coordinate(&self, _index: usize) -> Coordinate {
///         Coordinate::xy(self.month as f64, self.total)
///     }
/// }
/// ```
pub trait ChartModel: Clone + Send + Sync + 'static {
    const IDENTITY: PointIdentityStrategy = PointIdentityStrategy::PositionalKey;

    /// Address identifying this model under
    /// [`PointIdentityStrategy::ReferenceKey`]. `None` marks a null model.
    fn reference_address(&self) -> Option<usize> {
        None
    }

    fn coordinate(&self, index: usize) -> Coordinate;
}

macro_rules! impl_numeric_model {
    ($($ty:ty),*) => {
        $(
            impl ChartModel for $ty {
                #[inline]
                fn coordinate(&self, index: usize) -> Coordinate {
                    Coordinate::xy(index as f64, *self as f64)
                }
            }

            impl ChartModel for Option<$ty> {
                #[inline]
                fn coordinate(&self, index: usize) -> Coordinate {
                    match self {
                        Some(value) => Coordinate::xy(index as f64, *value as f64),
                        None => Coordinate::null_at(index as f64),
                    }
                }
            }
        )*
    };
}

impl_numeric_model!(f64, f32, i32, i64, u32);

impl<T: ChartModel> ChartModel for Arc<T> {
    const IDENTITY: PointIdentityStrategy = PointIdentityStrategy::ReferenceKey;

    fn reference_address(&self) -> Option<usize> {
        Some(Arc::as_ptr(self).cast::<()>() as usize)
    }

    fn coordinate(&self, index: usize) -> Coordinate {
        T::coordinate(self, index)
    }
}

impl<T: ChartModel> ChartModel for Option<Arc<T>> {
    const IDENTITY: PointIdentityStrategy = PointIdentityStrategy::ReferenceKey;

    fn reference_address(&self) -> Option<usize> {
        self.as_ref().and_then(|model| model.reference_address())
    }

    fn coordinate(&self, index: usize) -> Coordinate {
        match self {
            Some(model) => model.coordinate(index),
            None => Coordinate::null_at(index as f64),
        }
    }
}
