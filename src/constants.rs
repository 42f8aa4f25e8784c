/// User agent string for HTTP requests
pub const USER_AGENT: &str = "city-weather/0.1.0";

/// OpenWeatherMap direct geocoding endpoint
pub const GEOCODE_API_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";

/// OpenWeatherMap current weather endpoint
pub const WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// OpenWeatherMap 5 day / 3 hour forecast endpoint
pub const FORECAST_API_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Prefix for weather icon assets; the icon code and `.png` are appended
pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn/";

/// Storage key holding the JSON array of searched city names
pub const HISTORY_KEY: &str = "savedCities";

/// Local hours (start inclusive, end exclusive) treated as the daily temperature peak
pub const PEAK_WINDOW_START_HOUR: u32 = 13;
pub const PEAK_WINDOW_END_HOUR: u32 = 16;
