pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>geoselect</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 3rem auto; max-width: 32rem; }
    select, button { display: block; margin: 0.5rem 0; min-width: 16rem; padding: 0.3rem; }
    #status { min-height: 1.5rem; }
    #status.failed { color: #b00020; }
  </style>
</head>
<body>
  <div>
    <select id="country"><option value="">Select a country</option></select>
    <select id="city" disabled><option value="">Select a city</option></select>
    <p id="status" hidden></p>
    <button id="submit" disabled>Submit</button>
  </div>
  <script src="/app.js"></script>
</body>
</html>
"#;

pub const APP_JS: &str = r#"const countryEl = document.getElementById('country');
const cityEl = document.getElementById('city');
const statusEl = document.getElementById('status');
const submitEl = document.getElementById('submit');

function fillSelect(el, placeholder, items) {
  el.replaceChildren(new Option(placeholder, ''));
  for (const [value, label] of items) {
    el.appendChild(new Option(label, value));
  }
}

let renderedCountries = null;
let renderedCities = null;

function render(view) {
  const countriesKey = JSON.stringify(view.countries);
  if (countriesKey !== renderedCountries) {
    fillSelect(countryEl, 'Select a country', view.countries.map(c => [c.iso_code, c.name]));
    renderedCountries = countriesKey;
  }
  countryEl.value = view.selected_iso_code;

  const citiesKey = JSON.stringify(view.cities);
  if (citiesKey !== renderedCities) {
    fillSelect(cityEl, 'Select a city', view.cities.map(c => [c, c]));
    renderedCities = citiesKey;
  }
  cityEl.value = view.selected_city;
  cityEl.disabled = !view.city_selector_enabled;
  submitEl.disabled = !view.can_submit;

  if (view.status) {
    statusEl.textContent = view.status;
    statusEl.className = view.phase === 'Failed' ? 'failed' : '';
    statusEl.hidden = false;
  } else {
    statusEl.hidden = true;
  }
}

async function call(method, path, body) {
  const response = await fetch(path, {
    method,
    headers: body ? { 'Content-Type': 'application/json' } : {},
    body: body ? JSON.stringify(body) : undefined,
  });
  if (response.ok) {
    render(await response.json());
  } else {
    console.error(path, response.status, await response.text());
  }
}

countryEl.addEventListener('change', () => call('POST', '/api/country', { iso_code: countryEl.value }));
cityEl.addEventListener('change', () => call('POST', '/api/city', { city: cityEl.value }));
submitEl.addEventListener('click', () => call('POST', '/api/submit'));

// The directory loads after the server starts; poll briefly until it lands.
let statePolls = 0;
async function refresh() {
  const response = await fetch('/api/state');
  if (!response.ok) return;
  const view = await response.json();
  render(view);
  if (view.phase === 'Idle' && ++statePolls < 20) {
    setTimeout(refresh, 500);
  }
}

refresh();
"#;
