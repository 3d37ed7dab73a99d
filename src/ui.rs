use crate::models::DayView;
use crate::stats::format_number;

pub fn render_index(view: &DayView, catalog: &[String]) -> String {
    let selected = view.product.as_deref().unwrap_or_default();
    let options = if catalog.is_empty() {
        r#"<option disabled value="">Add a product to start</option>"#.to_string()
    } else {
        catalog
            .iter()
            .map(|product| {
                let marker = if product == selected { " selected" } else { "" };
                let name = escape_html(product);
                format!(r#"<option value="{name}"{marker}>{name}</option>"#)
            })
            .collect::<Vec<_>>()
            .join("")
    };

    INDEX_HTML
        .replace("{{DATE}}", &view.date)
        .replace("{{PRODUCT_OPTIONS}}", &options)
        .replace("{{TOTAL}}", &view.stat.total_for_day.to_string())
        .replace("{{DELIVERED}}", &view.stat.delivered.to_string())
        .replace("{{CONFIRMED}}", &view.stat.confirmed.to_string())
        .replace("{{CANCELLED}}", &view.stat.cancelled_company.to_string())
        .replace("{{NO_ANSWER}}", &view.stat.no_answer.to_string())
        .replace("{{YESTERDAY_NO_ANSWER}}", &format_number(view.yesterday_no_answer))
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Order Tracker</title>
  <style>
    :root {
      --bg: #f4f6f8;
      --ink: #1f2a33;
      --muted: #6b7680;
      --accent: #2f6fde;
      --danger: #c63b2b;
      --ok: #2d7a4b;
      --warn: #b7791f;
      --card: #ffffff;
      --border: #dfe4ea;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
      padding: 24px 16px 48px;
    }

    .container {
      width: min(920px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
      font-size: 2rem;
    }

    nav {
      display: flex;
      gap: 8px;
    }

    nav button.active {
      background: var(--accent);
      color: white;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--border);
      border-radius: 14px;
      padding: 20px;
    }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 12px;
      align-items: center;
    }

    .main-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(280px, 1fr));
      gap: 20px;
    }

    label {
      display: block;
      font-size: 0.9rem;
      color: var(--muted);
      margin-top: 10px;
    }

    input, select {
      width: 100%;
      padding: 8px 10px;
      border: 1px solid var(--border);
      border-radius: 8px;
      font-size: 1rem;
    }

    .row input, .row select {
      width: auto;
      flex: 1;
    }

    button {
      border: 1px solid var(--border);
      background: white;
      border-radius: 8px;
      padding: 8px 14px;
      font-size: 0.95rem;
      cursor: pointer;
    }

    button.primary {
      background: var(--accent);
      border-color: var(--accent);
      color: white;
    }

    button.danger {
      background: var(--danger);
      border-color: var(--danger);
      color: white;
    }

    .summary-item {
      display: flex;
      justify-content: space-between;
      padding: 6px 0;
      border-bottom: 1px solid var(--border);
    }

    .stats-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .stat-card {
      border: 1px solid var(--border);
      border-radius: 10px;
      padding: 14px;
      display: grid;
      gap: 6px;
    }

    .stat-card .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: var(--muted);
    }

    .stat-card .value {
      font-size: 1.5rem;
      font-weight: 600;
    }

    .stat-card .value.percent {
      color: var(--ok);
    }

    .stat-card .value.danger {
      color: var(--danger);
    }

    .danger-zone {
      border: 1px solid var(--danger);
      border-radius: 14px;
      padding: 20px;
    }

    .danger-zone h3 {
      margin-top: 0;
      color: var(--danger);
    }

    .product-list {
      list-style: none;
      padding: 0;
      margin: 12px 0 0;
    }

    .product-list li {
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 6px 0;
      border-bottom: 1px solid var(--border);
    }

    .toast-container {
      position: fixed;
      right: 16px;
      bottom: 16px;
      display: grid;
      gap: 8px;
    }

    .toast {
      padding: 10px 16px;
      border-radius: 8px;
      color: white;
      box-shadow: 0 6px 18px rgba(0, 0, 0, 0.15);
    }

    .toast.success { background: var(--ok); }
    .toast.error { background: var(--danger); }
    .toast.warning { background: var(--warn); }
    .toast.info { background: var(--accent); }

    [hidden] {
      display: none !important;
    }
  </style>
</head>
<body>
  <div class="container">
    <h1>Order Tracker</h1>

    <nav>
      <button type="button" class="active" data-page="entry">Data entry</button>
      <button type="button" data-page="stats">Statistics</button>
    </nav>

    <section id="page-entry">
      <div class="card row">
        <select id="product-select">{{PRODUCT_OPTIONS}}</select>
        <input id="new-product" type="text" placeholder="New product name" />
        <button type="button" class="primary" id="add-product">Add product</button>
      </div>

      <div class="card">
        <h2>Products</h2>
        <ul class="product-list" id="product-list"></ul>
      </div>

      <div class="main-grid">
        <form class="card" id="stats-form">
          <h2>Day stats</h2>
          <input type="date" id="entry-date" value="{{DATE}}" />
          <label for="total_for_day">Orders for the day</label>
          <input type="number" min="0" id="total_for_day" value="{{TOTAL}}" />
          <label for="delivered">Delivered</label>
          <input type="number" min="0" id="delivered" value="{{DELIVERED}}" />
          <label for="confirmed">Confirmed</label>
          <input type="number" min="0" id="confirmed" value="{{CONFIRMED}}" />
          <label for="cancelled_company">Cancelled (courier)</label>
          <input type="number" min="0" id="cancelled_company" value="{{CANCELLED}}" />
          <label for="no_answer">No answer</label>
          <input type="number" min="0" id="no_answer" value="{{NO_ANSWER}}" />
          <button type="submit" class="primary" style="width: 100%; margin-top: 16px;">Save</button>
        </form>

        <div class="card">
          <h2>Summary <span id="summary-date">{{DATE}}</span></h2>
          <div class="summary-item"><span>Orders</span><strong id="sum-total">{{TOTAL}}</strong></div>
          <div class="summary-item"><span>Delivered</span><strong id="sum-delivered">{{DELIVERED}}</strong></div>
          <div class="summary-item"><span>Confirmed</span><strong id="sum-confirmed">{{CONFIRMED}}</strong></div>
          <div class="summary-item"><span>Cancelled</span><strong id="sum-cancelled">{{CANCELLED}}</strong></div>
          <div class="summary-item"><span>No answer (today)</span><strong id="sum-no-answer">{{NO_ANSWER}}</strong></div>
          <div class="summary-item"><span>No answer (yesterday)</span><strong id="sum-yesterday">{{YESTERDAY_NO_ANSWER}}</strong></div>
        </div>
      </div>
    </section>

    <section id="page-stats" hidden>
      <div class="card row">
        <label for="filter-product">Product</label>
        <select id="filter-product"><option value="all">All products</option></select>
        <label for="filter-start">From</label>
        <input type="date" id="filter-start" />
        <label for="filter-end">To</label>
        <input type="date" id="filter-end" />
      </div>

      <div class="card">
        <h2 id="stats-title">Totals: all products</h2>
        <div class="stats-grid" id="stats-grid"></div>
      </div>

      <div class="danger-zone">
        <h3>Danger zone</h3>
        <p>This permanently deletes every daily statistic. The product list is kept.</p>
        <button type="button" class="danger" id="reset-stats">Reset all statistics</button>
      </div>
    </section>

    <div class="toast-container" id="toasts"></div>
  </div>

  <script>
    const $ = (id) => document.getElementById(id);
    const fields = ['total_for_day', 'delivered', 'confirmed', 'cancelled_company', 'no_answer'];
    const numberFormat = new Intl.NumberFormat('en-US');

    const request = async (method, url, body) => {
      const res = await fetch(url, {
        method,
        headers: body ? { 'content-type': 'application/json' } : {},
        body: body ? JSON.stringify(body) : undefined
      });
      loadToasts().catch(() => {});
      if (!res.ok) {
        throw new Error(await res.text());
      }
      return res.json();
    };

    const escapeText = (value) => String(value)
      .replace(/&/g, '&amp;')
      .replace(/</g, '&lt;')
      .replace(/>/g, '&gt;')
      .replace(/"/g, '&quot;')
      .replace(/'/g, '&#39;');

    const loadToasts = async () => {
      const res = await fetch('/api/notifications');
      const toasts = await res.json();
      $('toasts').innerHTML = toasts
        .map((toast) => `<div class="toast ${toast.kind}">${escapeText(toast.message)}</div>`)
        .join('');
    };

    const renderDay = (day) => {
      fields.forEach((field) => { $(field).value = day.stat[field]; });
      $('summary-date').textContent = day.date;
      $('sum-total').textContent = numberFormat.format(day.stat.total_for_day);
      $('sum-delivered').textContent = numberFormat.format(day.stat.delivered);
      $('sum-confirmed').textContent = numberFormat.format(day.stat.confirmed);
      $('sum-cancelled').textContent = numberFormat.format(day.stat.cancelled_company);
      $('sum-no-answer').textContent = numberFormat.format(day.stat.no_answer);
      $('sum-yesterday').textContent = numberFormat.format(day.yesterday_no_answer);
    };

    const loadDay = async () => {
      const params = new URLSearchParams({ date: $('entry-date').value });
      if ($('product-select').value) {
        params.set('product', $('product-select').value);
      }
      renderDay(await request('GET', `/api/day?${params}`));
    };

    const loadProducts = async () => {
      const catalog = await request('GET', '/api/products');
      $('product-select').innerHTML = catalog.products.length
        ? catalog.products
            .map((p) => `<option value="${escapeText(p)}"${p === catalog.selected ? ' selected' : ''}>${escapeText(p)}</option>`)
            .join('')
        : '<option disabled value="">Add a product to start</option>';
      $('product-list').innerHTML = catalog.products
        .map((p) => `<li><span>${escapeText(p)}</span><button type="button" class="danger" data-remove="${escapeText(p)}">Delete</button></li>`)
        .join('');
    };

    const statCard = (label, value, cls = '') =>
      `<div class="stat-card"><span class="label">${label}</span><span class="value ${cls}">${value}</span></div>`;

    const loadStats = async () => {
      const params = new URLSearchParams({
        product: $('filter-product').value,
        start: $('filter-start').value,
        end: $('filter-end').value
      });
      const stats = await request('GET', `/api/stats?${params}`);
      const f = stats.formatted;
      $('stats-title').textContent = `Totals: ${stats.filter === 'all' ? 'all products' : stats.filter}`;
      $('stats-grid').innerHTML = [
        statCard('Orders', f.orders),
        statCard('Delivered', f.delivered),
        statCard('Confirmed', f.confirmed),
        statCard('Cancelled', f.cancelled),
        statCard('No answer', f.no_answer),
        statCard('Success rate', f.success_rate, 'percent'),
        statCard('Confirmation rate', f.confirmation_rate, 'percent'),
        statCard('Delivery rate', f.delivery_after_confirmation_rate, 'percent'),
        statCard('No-answer rate', f.no_answer_rate, 'danger'),
        statCard('Cancellation rate', f.cancellation_rate, 'danger')
      ].join('');
    };

    const loadHistoricalProducts = async () => {
      const current = $('filter-product').value;
      const products = await request('GET', '/api/stats/products');
      $('filter-product').innerHTML = '<option value="all">All products</option>' + products
        .map((p) => `<option value="${escapeText(p)}"${p === current ? ' selected' : ''}>${escapeText(p)}</option>`)
        .join('');
    };

    const report = (err) => console.error(err);

    document.querySelectorAll('nav button').forEach((button) => {
      button.addEventListener('click', () => {
        document.querySelectorAll('nav button').forEach((b) => b.classList.toggle('active', b === button));
        $('page-entry').hidden = button.dataset.page !== 'entry';
        $('page-stats').hidden = button.dataset.page !== 'stats';
        if (button.dataset.page === 'stats') {
          loadHistoricalProducts().then(loadStats).catch(report);
        }
      });
    });

    $('add-product').addEventListener('click', () => {
      request('POST', '/api/products', { name: $('new-product').value })
        .then(() => { $('new-product').value = ''; })
        .then(loadProducts)
        .then(loadDay)
        .catch(report);
    });

    $('product-list').addEventListener('click', (event) => {
      const name = event.target.dataset.remove;
      if (name && confirm(`Delete "${name}"?`)) {
        request('DELETE', `/api/products/${encodeURIComponent(name)}`).then(loadProducts).then(loadDay).catch(report);
      }
    });

    $('product-select').addEventListener('change', () => {
      request('POST', '/api/selection', { product: $('product-select').value }).then(loadDay).catch(report);
    });

    $('entry-date').addEventListener('change', () => loadDay().catch(report));

    $('stats-form').addEventListener('submit', (event) => {
      event.preventDefault();
      const stat = {};
      fields.forEach((field) => { stat[field] = Number($(field).value) || 0; });
      request('POST', '/api/day', { date: $('entry-date').value, product: $('product-select').value || null, stat })
        .then(renderDay)
        .catch(report);
    });

    ['filter-product', 'filter-start', 'filter-end'].forEach((id) => {
      $(id).addEventListener('change', () => loadStats().catch(report));
    });

    $('reset-stats').addEventListener('click', () => {
      if (confirm('Delete all statistics? This cannot be undone.')) {
        request('DELETE', '/api/stats').then(loadHistoricalProducts).then(loadStats).catch(report);
      }
    });

    setInterval(() => loadToasts().catch(() => {}), 1000);
    loadProducts().catch(report);
  </script>
</body>
</html>
"#;
