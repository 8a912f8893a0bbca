use super::StationId;

#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("network contains no stations")]
    EmptyNetwork,
    #[error("station {0} has a non-finite coordinate")]
    InvalidStationCoordinate(StationId),
    #[error("station {station} has a travel option to unknown station {stop}")]
    UnknownTravelOptionStop { station: StationId, stop: u32 },
    #[error("failure decoding network payload: {0}")]
    DecodeError(String),
}
