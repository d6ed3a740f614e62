use panel::PanelError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("http client setup failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("server refused the socket: {0}")]
    Refused(String),
    #[error("timed out waiting for socket registration")]
    Timeout,
    #[error("socket packet error: {0}")]
    Codec(#[from] frames::CodecError),
    #[error(transparent)]
    Api(#[from] PanelError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for CliError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::WsConnect(Box::new(error))
    }
}
