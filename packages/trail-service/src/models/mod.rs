pub mod location;
pub mod requests;
pub mod route;

// Re-export commonly used types
pub use location::{
    validate_coordinates, Difficulty, LocationPoint, LocationValidationError, RawRecord,
    TrailLocation, REQUIRED_FIELDS,
};
pub use requests::{
    BoundsResponse, LocationEntry, LocationQuery, LocationsResponse, RouteResponse,
    ValidateDataResponse,
};
pub use route::Route;
